//! Static configuration for the contact engine.
//!
//! # Responsibility
//! - Parse the JSON configuration document shipped with the host app.
//! - Resolve dotted-path lookups (`"performance.debouncing.searchDelay"`).
//! - Derive validated loader batching parameters.
//!
//! # Invariants
//! - Missing keys fall back to defaults; present-but-invalid values are errors.
//! - Batch sizes are strictly positive.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

/// Records released synchronously when a load completes.
pub const INITIAL_BATCH: usize = 50;
/// Records released per background or explicit batch.
pub const BATCH_SIZE: usize = 50;
/// Delay between two background batches.
pub const BACKGROUND_THRESHOLD: Duration = Duration::from_millis(100);
/// Search debounce suggested to UI collaborators.
pub const DEFAULT_SEARCH_DELAY_MS: u64 = 300;

const INITIAL_BATCH_PATH: &str = "contacts.loading.initialBatch";
const BATCH_SIZE_PATH: &str = "contacts.loading.batchSize";
const BACKGROUND_DELAY_PATH: &str = "contacts.loading.backgroundDelayMs";
const SEARCH_DELAY_PATH: &str = "performance.debouncing.searchDelay";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse(String),
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read config `{path}`: {message}"),
            Self::Parse(message) => write!(f, "invalid config document: {message}"),
            Self::Invalid { key, message } => write!(f, "invalid config value `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Parsed configuration document with dotted-path access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let root: Value =
            serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        if !root.is_object() {
            return Err(ConfigError::Parse("top-level value must be an object".into()));
        }
        Ok(Self { root })
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    /// Raw value at a dotted path, if present.
    pub fn value(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.root, |node, key| node.as_object()?.get(key))
    }

    /// Typed value at a dotted path; `None` when missing or of another type.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.value(path)
            .and_then(|value| T::deserialize(value).ok())
    }

    /// Debounce delay UI collaborators should apply before `update_filters`.
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(
            self.get::<u64>(SEARCH_DELAY_PATH)
                .unwrap_or(DEFAULT_SEARCH_DELAY_MS),
        )
    }
}

/// Batching parameters for the incremental loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    pub initial_batch: usize,
    pub batch_size: usize,
    pub background_delay: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            initial_batch: INITIAL_BATCH,
            batch_size: BATCH_SIZE,
            background_delay: BACKGROUND_THRESHOLD,
        }
    }
}

impl LoaderConfig {
    /// Reads `contacts.loading.*`, defaulting missing keys.
    pub fn from_document(doc: &ConfigDocument) -> ConfigResult<Self> {
        let defaults = Self::default();
        let config = Self {
            initial_batch: read_count(doc, INITIAL_BATCH_PATH)?.unwrap_or(defaults.initial_batch),
            batch_size: read_count(doc, BATCH_SIZE_PATH)?.unwrap_or(defaults.batch_size),
            background_delay: read_count(doc, BACKGROUND_DELAY_PATH)?
                .map(|ms| Duration::from_millis(ms as u64))
                .unwrap_or(defaults.background_delay),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.initial_batch == 0 {
            return Err(ConfigError::Invalid {
                key: INITIAL_BATCH_PATH,
                message: "must be greater than zero".into(),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: BATCH_SIZE_PATH,
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

fn read_count(doc: &ConfigDocument, key: &'static str) -> ConfigResult<Option<usize>> {
    let Some(value) = doc.value(key) else {
        return Ok(None);
    };
    value
        .as_u64()
        .and_then(|number| usize::try_from(number).ok())
        .map(Some)
        .ok_or_else(|| ConfigError::Invalid {
            key,
            message: format!("expected a non-negative integer, got `{value}`"),
        })
}
