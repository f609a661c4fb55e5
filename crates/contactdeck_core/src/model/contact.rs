//! Canonical contact record.
//!
//! # Responsibility
//! - Define the normalized shape every other module works on.
//! - Classify where a record came from (`SourceType`).
//!
//! # Invariants
//! - `id` is unique within one aggregate.
//! - `created_at` / `modified_at` are always set (epoch ms); unknown source
//!   timestamps use [`UNKNOWN_TIMESTAMP_MS`], never the wall clock.
//! - `is_favorite` is an overlay projection; the service's favorite set is the
//!   source of truth.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Stable contact identifier issued by the external directory.
pub type ContactId = String;

/// Sentinel for unknown source timestamps: 1980-01-01T00:00:00Z in epoch ms.
pub const UNKNOWN_TIMESTAMP_MS: i64 = 315_532_800_000;

/// Classification of the account a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Device,
    Sim,
    Google,
    Exchange,
    Other,
}

impl SourceType {
    /// Stable lowercase name, also used as the `by_source` stats key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Sim => "sim",
            Self::Google => "google",
            Self::Exchange => "exchange",
            Self::Other => "other",
        }
    }

    /// Parses a stable lowercase name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "device" => Some(Self::Device),
            "sim" => Some(Self::Sim),
            "google" => Some(Self::Google),
            "exchange" => Some(Self::Exchange),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl Display for SourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account metadata attached to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSource {
    #[serde(rename = "type")]
    pub kind: SourceType,
    pub name: String,
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    pub id: String,
    pub number: String,
    pub label: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: String,
    pub email: String,
    pub label: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub label: String,
}

/// Normalized contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    /// Display name; never empty after normalization.
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_numbers: Vec<PhoneNumber>,
    pub emails: Vec<Email>,
    pub addresses: Vec<Address>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub source: ContactSource,
    /// Reference to an externally owned photo resource.
    pub image_uri: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Drives delta-merge replacement.
    pub modified_at: i64,
    pub tags: Vec<String>,
    pub is_favorite: bool,
}

impl Contact {
    /// Returns the default display/dial number.
    ///
    /// An explicitly primary entry wins; otherwise the first entry is used.
    pub fn primary_phone(&self) -> Option<&PhoneNumber> {
        self.phone_numbers
            .iter()
            .find(|phone| phone.is_primary)
            .or_else(|| self.phone_numbers.first())
    }

    /// Returns the default email address, same rule as [`Self::primary_phone`].
    pub fn primary_email(&self) -> Option<&Email> {
        self.emails
            .iter()
            .find(|email| email.is_primary)
            .or_else(|| self.emails.first())
    }

    /// Whether this record references a photo.
    pub fn has_photo(&self) -> bool {
        self.image_uri
            .as_deref()
            .is_some_and(|uri| !uri.trim().is_empty())
    }
}

/// Summary counts over the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
    pub total: usize,
    /// Keyed by [`SourceType::as_str`]; sources with no records are absent.
    pub by_source: BTreeMap<String, usize>,
    pub favorites: usize,
    pub with_photos: usize,
}

impl ContactStats {
    /// Returns the count for one source type (0 when absent).
    pub fn source_count(&self, kind: SourceType) -> usize {
        self.by_source.get(kind.as_str()).copied().unwrap_or(0)
    }
}
