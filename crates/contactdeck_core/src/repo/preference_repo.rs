//! Preference repository over the SQLite key-value table.
//!
//! # Responsibility
//! - Persist the favorite-id set, last-used filters and last sync time.
//!
//! # Invariants
//! - Values are stored as text: JSON for structured values, decimal for times.
//! - Unparseable stored values surface as `InvalidData`, never as defaults.

use crate::db::DbError;
use crate::model::contact::ContactId;
use crate::model::filters::SearchFilters;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const FAVORITES_KEY: &str = "favorite_contacts";
pub const FILTERS_KEY: &str = "contact_filters";
pub const LAST_SYNC_KEY: &str = "last_sync_timestamp";

pub type RepoResult<T> = Result<T, RepoError>;

/// Preference persistence error.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData { key: &'static str, message: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid stored preference `{key}`: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Small persisted state owned by the contact service.
pub trait PreferenceRepository {
    fn load_favorites(&self) -> RepoResult<HashSet<ContactId>>;
    fn save_favorites(&self, favorites: &HashSet<ContactId>) -> RepoResult<()>;
    fn load_filters(&self) -> RepoResult<Option<SearchFilters>>;
    fn save_filters(&self, filters: &SearchFilters) -> RepoResult<()>;
    /// Epoch ms of the last successful load/refresh.
    fn load_last_sync(&self) -> RepoResult<Option<i64>>;
    fn save_last_sync(&self, epoch_ms: i64) -> RepoResult<()>;
}

/// SQLite-backed preference repository.
pub struct SqlitePreferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePreferenceRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

impl PreferenceRepository for SqlitePreferenceRepository<'_> {
    fn load_favorites(&self) -> RepoResult<HashSet<ContactId>> {
        let Some(text) = self.get(FAVORITES_KEY)? else {
            return Ok(HashSet::new());
        };
        let ids: Vec<ContactId> = serde_json::from_str(&text).map_err(|err| {
            RepoError::InvalidData {
                key: FAVORITES_KEY,
                message: err.to_string(),
            }
        })?;
        Ok(ids.into_iter().collect())
    }

    fn save_favorites(&self, favorites: &HashSet<ContactId>) -> RepoResult<()> {
        // Sorted so the stored value is stable across runs.
        let sorted: BTreeSet<&ContactId> = favorites.iter().collect();
        let text = serde_json::to_string(&sorted).map_err(|err| RepoError::InvalidData {
            key: FAVORITES_KEY,
            message: err.to_string(),
        })?;
        self.set(FAVORITES_KEY, &text)
    }

    fn load_filters(&self) -> RepoResult<Option<SearchFilters>> {
        let Some(text) = self.get(FILTERS_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| RepoError::InvalidData {
                key: FILTERS_KEY,
                message: err.to_string(),
            })
    }

    fn save_filters(&self, filters: &SearchFilters) -> RepoResult<()> {
        let text = serde_json::to_string(filters).map_err(|err| RepoError::InvalidData {
            key: FILTERS_KEY,
            message: err.to_string(),
        })?;
        self.set(FILTERS_KEY, &text)
    }

    fn load_last_sync(&self) -> RepoResult<Option<i64>> {
        let Some(text) = self.get(LAST_SYNC_KEY)? else {
            return Ok(None);
        };
        text.trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|err| RepoError::InvalidData {
                key: LAST_SYNC_KEY,
                message: err.to_string(),
            })
    }

    fn save_last_sync(&self, epoch_ms: i64) -> RepoResult<()> {
        self.set(LAST_SYNC_KEY, &epoch_ms.to_string())
    }
}
