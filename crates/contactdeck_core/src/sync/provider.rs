//! Device contact retrieval contract.
//!
//! # Responsibility
//! - Define the single "pull everything" call the loader depends on.
//! - Provide fixture-backed providers for probes and tests.
//!
//! # Invariants
//! - One `fetch_all` call returns the complete raw set; no server-side paging.

use crate::model::raw::RawContact;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Retrieval facility failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Access to the directory was refused.
    PermissionDenied,
    /// The facility failed for another (possibly transient) reason.
    RetrievalFailure { message: String },
}

impl ProviderError {
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::RetrievalFailure {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::RetrievalFailure { .. } => "retrieval_failure",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "contacts permission not granted"),
            Self::RetrievalFailure { message } => {
                write!(f, "failed to retrieve contacts: {message}")
            }
        }
    }
}

impl Error for ProviderError {}

/// External contact directory.
pub trait ContactProvider {
    /// Short identifier used in log lines.
    fn provider_id(&self) -> &str;

    /// Returns every raw record the directory currently exposes.
    fn fetch_all(&self) -> ProviderResult<Vec<RawContact>>;
}

impl<P: ContactProvider + ?Sized> ContactProvider for &P {
    fn provider_id(&self) -> &str {
        (**self).provider_id()
    }

    fn fetch_all(&self) -> ProviderResult<Vec<RawContact>> {
        (**self).fetch_all()
    }
}

/// Provider serving a JSON array of raw records from disk on every pull.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContactProvider for JsonFileProvider {
    fn provider_id(&self) -> &str {
        "json_file"
    }

    fn fetch_all(&self) -> ProviderResult<Vec<RawContact>> {
        let text = std::fs::read_to_string(&self.path).map_err(|err| {
            ProviderError::retrieval(format!("cannot read `{}`: {err}", self.path.display()))
        })?;
        parse_raw_contacts(&text)
    }
}

/// Parses a JSON array of raw records.
pub fn parse_raw_contacts(json: &str) -> ProviderResult<Vec<RawContact>> {
    serde_json::from_str(json)
        .map_err(|err| ProviderError::retrieval(format!("invalid contact payload: {err}")))
}
