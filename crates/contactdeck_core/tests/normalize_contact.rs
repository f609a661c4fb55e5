mod common;

use common::{raw, raw_from_source, raw_full};
use contactdeck_core::ingest::normalize::{classify_source, UNNAMED_CONTACT};
use contactdeck_core::model::raw::{
    RawAddress, RawContact, RawDate, RawEmail, RawImage, RawPhoneNumber, RawSource,
};
use contactdeck_core::{normalize, SourceType, UNKNOWN_TIMESTAMP_MS};
use std::collections::HashSet;

#[test]
fn empty_record_resolves_to_documented_defaults() {
    let contact = normalize(&RawContact {
        id: Some("42".to_string()),
        ..RawContact::default()
    });

    assert_eq!(contact.id, "42");
    assert_eq!(contact.name, UNNAMED_CONTACT);
    assert!(contact.phone_numbers.is_empty());
    assert!(contact.emails.is_empty());
    assert!(contact.addresses.is_empty());
    assert!(contact.tags.is_empty());
    assert!(!contact.is_favorite);
    assert_eq!(contact.source.kind, SourceType::Device);
    assert_eq!(contact.source.name, "Device");
    assert_eq!(contact.image_uri, None);
}

#[test]
fn missing_timestamps_use_sentinel_not_now() {
    let missing = normalize(&raw("1", "Ann"));
    assert_eq!(missing.created_at, UNKNOWN_TIMESTAMP_MS);
    assert_eq!(missing.modified_at, UNKNOWN_TIMESTAMP_MS);

    let non_positive = normalize(&RawContact {
        creation_date: Some(0),
        modification_date: Some(-1),
        ..raw("2", "Bob")
    });
    assert_eq!(non_positive.created_at, UNKNOWN_TIMESTAMP_MS);
    assert_eq!(non_positive.modified_at, UNKNOWN_TIMESTAMP_MS);
}

#[test]
fn timestamps_accept_seconds_millis_and_labelled_dates() {
    let contact = normalize(&RawContact {
        creation_date: Some(1_600_000_000),
        dates: Some(vec![
            RawDate {
                label: Some("birthday".to_string()),
                date: Some(1_000),
            },
            RawDate {
                label: Some("Modified".to_string()),
                date: Some(1_650_000_000_000),
            },
        ]),
        ..raw("1", "Ann")
    });

    assert_eq!(contact.created_at, 1_600_000_000_000);
    assert_eq!(contact.modified_at, 1_650_000_000_000);
}

#[test]
fn sub_record_ids_are_synthesized_and_unique() {
    let contact = normalize(&RawContact {
        phone_numbers: Some(vec![
            RawPhoneNumber {
                number: Some("555-0100".to_string()),
                ..RawPhoneNumber::default()
            },
            RawPhoneNumber {
                number: Some("555-0101".to_string()),
                ..RawPhoneNumber::default()
            },
        ]),
        emails: Some(vec![RawEmail {
            email: Some("ann@example.com".to_string()),
            ..RawEmail::default()
        }]),
        addresses: Some(vec![RawAddress {
            city: Some("Oslo".to_string()),
            ..RawAddress::default()
        }]),
        ..raw("7", "Ann")
    });

    assert_eq!(contact.phone_numbers[0].id, "7-phone-0");
    assert_eq!(contact.phone_numbers[1].id, "7-phone-1");
    assert_eq!(contact.emails[0].id, "7-email-0");
    assert_eq!(contact.addresses[0].id, "7-address-0");
    assert_eq!(contact.phone_numbers[0].label, "mobile");
    assert_eq!(contact.emails[0].label, "personal");
    assert_eq!(contact.addresses[0].label, "home");

    let ids: HashSet<_> = contact
        .phone_numbers
        .iter()
        .map(|p| p.id.clone())
        .chain(contact.emails.iter().map(|e| e.id.clone()))
        .chain(contact.addresses.iter().map(|a| a.id.clone()))
        .collect();
    assert_eq!(ids.len(), 4);
}

#[test]
fn first_phone_is_primary_unless_another_is_explicit() {
    let implicit = normalize(&RawContact {
        phone_numbers: Some(vec![
            RawPhoneNumber {
                number: Some("111".to_string()),
                ..RawPhoneNumber::default()
            },
            RawPhoneNumber {
                number: Some("222".to_string()),
                ..RawPhoneNumber::default()
            },
        ]),
        ..raw("1", "Ann")
    });
    assert!(implicit.phone_numbers[0].is_primary);
    assert!(!implicit.phone_numbers[1].is_primary);
    assert_eq!(implicit.primary_phone().unwrap().number, "111");

    let explicit = normalize(&RawContact {
        phone_numbers: Some(vec![
            RawPhoneNumber {
                number: Some("111".to_string()),
                ..RawPhoneNumber::default()
            },
            RawPhoneNumber {
                number: Some("222".to_string()),
                is_primary: Some(true),
                ..RawPhoneNumber::default()
            },
        ]),
        ..raw("2", "Bob")
    });
    assert!(!explicit.phone_numbers[0].is_primary);
    assert_eq!(explicit.primary_phone().unwrap().number, "222");
}

#[test]
fn source_classification_is_case_insensitive_substring() {
    let cases = [
        ("someone@GMAIL.com", SourceType::Google),
        ("Google Contacts", SourceType::Google),
        ("SIM1", SourceType::Sim),
        ("Corp Exchange", SourceType::Exchange),
        ("Phone", SourceType::Device),
    ];
    for (name, expected) in cases {
        let contact = normalize(&raw_from_source("1", "Ann", name));
        assert_eq!(contact.source.kind, expected, "source `{name}`");
        assert_eq!(contact.source.name, name);
    }
    assert_eq!(classify_source(None), SourceType::Device);
    assert_eq!(
        classify_source(Some(&RawSource {
            kind: Some("com.google".to_string()),
            ..RawSource::default()
        })),
        SourceType::Google
    );
}

#[test]
fn image_uri_requires_available_flag() {
    let image = Some(RawImage {
        uri: Some("file:///photo.jpg".to_string()),
    });
    let available = normalize(&RawContact {
        image_available: Some(true),
        image: image.clone(),
        ..raw("1", "Ann")
    });
    assert_eq!(available.image_uri.as_deref(), Some("file:///photo.jpg"));
    assert!(available.has_photo());

    let unavailable = normalize(&RawContact {
        image_available: Some(false),
        image,
        ..raw("2", "Bob")
    });
    assert_eq!(unavailable.image_uri, None);
}

#[test]
fn missing_id_is_derived_from_record_content() {
    let nameless = RawContact {
        id: None,
        ..raw_full("ignored", "Nobody", "Acme", "555-0100", "Nobody@Example.com")
    };
    let relabelled = RawContact {
        note: Some("met at the fair".into()),
        modification_date: Some(1_800_000_000),
        ..nameless.clone()
    };
    let other = RawContact {
        id: None,
        ..raw_full("ignored", "Somebody", "Acme", "555-0100", "nobody@example.com")
    };

    let first = normalize(&nameless);
    assert!(first.id.starts_with("local-"));
    assert_eq!(normalize(&nameless).id, first.id);
    assert_eq!(normalize(&relabelled).id, first.id);
    assert_ne!(normalize(&other).id, first.id);
    assert!(first.phone_numbers[0].id.starts_with(&first.id));
}

#[test]
fn raw_records_deserialize_from_facility_json() {
    let raw: RawContact = serde_json::from_str(
        r#"{
            "id": "9",
            "name": "Dana Scully",
            "firstName": "Dana",
            "jobTitle": "Agent",
            "phoneNumbers": [{"number": "555-0199", "label": "work"}],
            "source": {"name": "dana@gmail.com"},
            "modificationDate": 1700000000
        }"#,
    )
    .unwrap();
    let contact = normalize(&raw);

    assert_eq!(contact.first_name.as_deref(), Some("Dana"));
    assert_eq!(contact.job_title.as_deref(), Some("Agent"));
    assert_eq!(contact.phone_numbers[0].label, "work");
    assert_eq!(contact.source.kind, SourceType::Google);
    assert_eq!(contact.modified_at, 1_700_000_000_000);
}
