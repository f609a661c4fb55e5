#![allow(dead_code)]

use contactdeck_core::model::raw::{RawContact, RawEmail, RawPhoneNumber, RawSource};
use contactdeck_core::{
    ContactProvider, ContactService, LoaderConfig, ProviderError, ProviderResult,
    SqlitePreferenceRepository,
};
use rusqlite::Connection;
use std::cell::{Cell, RefCell};
use std::time::Duration;

pub type TestService<'a> = ContactService<&'a ScriptedProvider, SqlitePreferenceRepository<'a>>;

/// Provider returning whatever result the test last scripted.
pub struct ScriptedProvider {
    result: RefCell<ProviderResult<Vec<RawContact>>>,
    calls: Cell<usize>,
}

impl ScriptedProvider {
    pub fn with_records(records: Vec<RawContact>) -> Self {
        Self {
            result: RefCell::new(Ok(records)),
            calls: Cell::new(0),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            result: RefCell::new(Err(err)),
            calls: Cell::new(0),
        }
    }

    pub fn set_records(&self, records: Vec<RawContact>) {
        *self.result.borrow_mut() = Ok(records);
    }

    pub fn set_error(&self, err: ProviderError) {
        *self.result.borrow_mut() = Err(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ContactProvider for ScriptedProvider {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    fn fetch_all(&self) -> ProviderResult<Vec<RawContact>> {
        self.calls.set(self.calls.get() + 1);
        self.result.borrow().clone()
    }
}

pub fn loader_config(initial_batch: usize, batch_size: usize) -> LoaderConfig {
    LoaderConfig {
        initial_batch,
        batch_size,
        background_delay: Duration::from_millis(100),
    }
}

pub fn service<'a>(
    provider: &'a ScriptedProvider,
    conn: &'a Connection,
    config: LoaderConfig,
) -> TestService<'a> {
    ContactService::new(provider, SqlitePreferenceRepository::new(conn), config)
}

pub fn raw(id: &str, name: &str) -> RawContact {
    RawContact {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        ..RawContact::default()
    }
}

pub fn raw_modified(id: &str, name: &str, modified_ms: i64) -> RawContact {
    RawContact {
        modification_date: Some(modified_ms),
        ..raw(id, name)
    }
}

pub fn raw_full(id: &str, name: &str, company: &str, phone: &str, email: &str) -> RawContact {
    RawContact {
        company: Some(company.to_string()),
        phone_numbers: Some(vec![RawPhoneNumber {
            number: Some(phone.to_string()),
            ..RawPhoneNumber::default()
        }]),
        emails: Some(vec![RawEmail {
            email: Some(email.to_string()),
            ..RawEmail::default()
        }]),
        ..raw(id, name)
    }
}

pub fn raw_from_source(id: &str, name: &str, source_name: &str) -> RawContact {
    RawContact {
        source: Some(RawSource {
            name: Some(source_name.to_string()),
            ..RawSource::default()
        }),
        ..raw(id, name)
    }
}

/// `count` records with ids `c000..` and names `Contact 000..`.
pub fn raw_batch(count: usize) -> Vec<RawContact> {
    (0..count)
        .map(|index| raw(&format!("c{index:03}"), &format!("Contact {index:03}")))
        .collect()
}

pub fn no_sleep(_: Duration) {}
