//! Raw record -> `Contact` normalization.
//!
//! # Responsibility
//! - Convert any `RawContact` into the canonical `Contact` shape.
//! - Classify the source account.
//!
//! # Invariants
//! - Total: never fails and never drops a record.
//! - Sub-record ids are `<parent>-phone-<i>` / `-email-<i>` / `-address-<i>`
//!   when the raw entry has none, so they are unique within one pass.
//! - Missing or non-positive timestamps become `UNKNOWN_TIMESTAMP_MS`.
//! - A record without an id gets `local-<uuid v5>` derived from its identifying
//!   content, so repeated pulls of the same record yield the same id.

use crate::model::contact::{
    Address, Contact, ContactSource, Email, PhoneNumber, SourceType, UNKNOWN_TIMESTAMP_MS,
};
use crate::model::raw::{RawAddress, RawContact, RawDate, RawEmail, RawPhoneNumber, RawSource};
use uuid::Uuid;

/// Display name used when the raw record has none.
pub const UNNAMED_CONTACT: &str = "No Name";
/// Source name used when the raw record carries no account metadata.
pub const DEFAULT_SOURCE_NAME: &str = "Device";

const DEFAULT_PHONE_LABEL: &str = "mobile";
const DEFAULT_EMAIL_LABEL: &str = "personal";
const DEFAULT_ADDRESS_LABEL: &str = "home";
/// Raw timestamps at or above this value are already milliseconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;
/// Namespace for content-derived ids of records pulled without one.
const LOCAL_ID_NAMESPACE: Uuid = Uuid::from_u128(0x5c1d_7a0e_3f42_4b8e_9d61_c0a4_e2f7_1b93);

/// Normalizes one raw record.
pub fn normalize(raw: &RawContact) -> Contact {
    let id = non_blank(raw.id.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| local_id(raw));

    let phone_numbers = normalize_phones(&id, raw.phone_numbers.as_deref().unwrap_or_default());
    let emails = normalize_emails(&id, raw.emails.as_deref().unwrap_or_default());
    let addresses = raw
        .addresses
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(index, address)| normalize_address(&id, index, address))
        .collect();

    let dates = raw.dates.as_deref().unwrap_or_default();
    let created_at = resolve_timestamp(raw.creation_date, dates, "created");
    let modified_at = resolve_timestamp(raw.modification_date, dates, "modified");

    Contact {
        name: non_blank(raw.name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| UNNAMED_CONTACT.to_string()),
        first_name: raw.first_name.clone(),
        last_name: raw.last_name.clone(),
        phone_numbers,
        emails,
        addresses,
        job_title: raw.job_title.clone(),
        company: raw.company.clone(),
        notes: raw.note.clone(),
        source: normalize_source(raw.source.as_ref()),
        image_uri: resolve_image_uri(raw),
        created_at,
        modified_at,
        tags: Vec::new(),
        is_favorite: false,
        id,
    }
}

/// Stable id for a record the facility returned without one.
///
/// Hashes name fields, numbers and email addresses; labels, notes and
/// timestamps are left out so edits to them keep the id.
pub fn local_id(raw: &RawContact) -> String {
    let mut key = String::new();
    for part in [
        raw.name.as_deref(),
        raw.first_name.as_deref(),
        raw.last_name.as_deref(),
        raw.company.as_deref(),
    ] {
        key.push_str(part.unwrap_or_default().trim());
        key.push('\u{1f}');
    }
    for phone in raw.phone_numbers.as_deref().unwrap_or_default() {
        key.push_str(phone.number.as_deref().unwrap_or_default().trim());
        key.push('\u{1e}');
    }
    key.push('\u{1f}');
    for email in raw.emails.as_deref().unwrap_or_default() {
        key.push_str(&email.email.as_deref().unwrap_or_default().trim().to_lowercase());
        key.push('\u{1e}');
    }
    format!("local-{}", Uuid::new_v5(&LOCAL_ID_NAMESPACE, key.as_bytes()))
}

/// Normalizes a full pull, preserving input order.
pub fn normalize_all(raw: &[RawContact]) -> Vec<Contact> {
    raw.iter().map(normalize).collect()
}

/// Classifies account metadata by case-insensitive substring match.
///
/// `gmail`/`google` -> Google, `sim` -> Sim, `exchange` -> Exchange, else Device.
pub fn classify_source(source: Option<&RawSource>) -> SourceType {
    let Some(source) = source else {
        return SourceType::Device;
    };
    let haystack = [source.name.as_deref(), source.kind.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if haystack.contains("gmail") || haystack.contains("google") {
        SourceType::Google
    } else if haystack.contains("sim") {
        SourceType::Sim
    } else if haystack.contains("exchange") {
        SourceType::Exchange
    } else {
        SourceType::Device
    }
}

/// Converts a raw epoch value (seconds or ms) into epoch ms.
///
/// Returns `None` for missing or non-positive input.
pub fn normalize_timestamp(raw: Option<i64>) -> Option<i64> {
    let value = raw.filter(|value| *value > 0)?;
    if value >= MILLIS_THRESHOLD {
        Some(value)
    } else {
        Some(value.saturating_mul(1000))
    }
}

fn resolve_timestamp(primary: Option<i64>, dates: &[RawDate], label: &str) -> i64 {
    normalize_timestamp(primary)
        .or_else(|| {
            dates
                .iter()
                .filter(|date| {
                    date.label
                        .as_deref()
                        .is_some_and(|value| value.trim().eq_ignore_ascii_case(label))
                })
                .find_map(|date| normalize_timestamp(date.date))
        })
        .unwrap_or(UNKNOWN_TIMESTAMP_MS)
}

fn normalize_source(raw: Option<&RawSource>) -> ContactSource {
    ContactSource {
        kind: classify_source(raw),
        name: raw
            .and_then(|source| non_blank(source.name.as_deref()))
            .unwrap_or(DEFAULT_SOURCE_NAME)
            .to_string(),
        account_id: raw
            .and_then(|source| non_blank(source.id.as_deref()))
            .map(str::to_string),
    }
}

fn resolve_image_uri(raw: &RawContact) -> Option<String> {
    if raw.image_available == Some(false) {
        return None;
    }
    raw.image
        .as_ref()
        .and_then(|image| non_blank(image.uri.as_deref()))
        .map(str::to_string)
}

fn normalize_phones(parent_id: &str, raw: &[RawPhoneNumber]) -> Vec<PhoneNumber> {
    let has_explicit_primary = raw.iter().any(|phone| phone.is_primary == Some(true));
    raw.iter()
        .enumerate()
        .map(|(index, phone)| PhoneNumber {
            id: sub_record_id(phone.id.as_deref(), parent_id, "phone", index),
            number: phone.number.clone().unwrap_or_default(),
            label: label_or(phone.label.as_deref(), DEFAULT_PHONE_LABEL),
            is_primary: resolve_primary(phone.is_primary, has_explicit_primary, index),
        })
        .collect()
}

fn normalize_emails(parent_id: &str, raw: &[RawEmail]) -> Vec<Email> {
    let has_explicit_primary = raw.iter().any(|email| email.is_primary == Some(true));
    raw.iter()
        .enumerate()
        .map(|(index, email)| Email {
            id: sub_record_id(email.id.as_deref(), parent_id, "email", index),
            email: email.email.clone().unwrap_or_default(),
            label: label_or(email.label.as_deref(), DEFAULT_EMAIL_LABEL),
            is_primary: resolve_primary(email.is_primary, has_explicit_primary, index),
        })
        .collect()
}

fn normalize_address(parent_id: &str, index: usize, raw: &RawAddress) -> Address {
    Address {
        id: sub_record_id(raw.id.as_deref(), parent_id, "address", index),
        street: raw.street.clone(),
        city: raw.city.clone(),
        region: raw.region.clone(),
        postal_code: raw.postal_code.clone(),
        country: raw.country.clone(),
        label: label_or(raw.label.as_deref(), DEFAULT_ADDRESS_LABEL),
    }
}

fn resolve_primary(raw: Option<bool>, has_explicit_primary: bool, index: usize) -> bool {
    if has_explicit_primary {
        raw == Some(true)
    } else {
        index == 0
    }
}

fn sub_record_id(raw: Option<&str>, parent_id: &str, kind: &str, index: usize) -> String {
    non_blank(raw)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{parent_id}-{kind}-{index}"))
}

fn label_or(raw: Option<&str>, fallback: &str) -> String {
    non_blank(raw).unwrap_or(fallback).to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
