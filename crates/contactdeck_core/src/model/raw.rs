//! Raw records as delivered by the device contact facility.
//!
//! Every field is optional; the normalizer decides defaults. Wire names follow
//! the facility's camelCase JSON shape so fixtures can be deserialized as-is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawContact {
    pub id: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_numbers: Option<Vec<RawPhoneNumber>>,
    pub emails: Option<Vec<RawEmail>>,
    pub addresses: Option<Vec<RawAddress>>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub note: Option<String>,
    pub source: Option<RawSource>,
    pub image_available: Option<bool>,
    pub image: Option<RawImage>,
    /// Seconds or milliseconds since the Unix epoch.
    pub creation_date: Option<i64>,
    /// Seconds or milliseconds since the Unix epoch.
    pub modification_date: Option<i64>,
    /// Labelled dates; `created` / `modified` entries back up the fields above.
    pub dates: Option<Vec<RawDate>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPhoneNumber {
    pub id: Option<String>,
    pub number: Option<String>,
    pub label: Option<String>,
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEmail {
    pub id: Option<String>,
    pub email: Option<String>,
    pub label: Option<String>,
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAddress {
    pub id: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub label: Option<String>,
}

/// Account the record belongs to (e.g. `"user@gmail.com"`, `"SIM1"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSource {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDate {
    pub label: Option<String>,
    pub date: Option<i64>,
}
