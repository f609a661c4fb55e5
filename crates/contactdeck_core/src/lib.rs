//! Contact aggregation and query engine.
//!
//! Ingests raw device-directory records, populates an in-memory aggregate in
//! bounded batches, delta-merges refresh pulls, and serves a filtered, sorted,
//! searchable view plus summary statistics. This crate is the single source of
//! truth for those invariants; UI layers only call `ContactService`.

pub mod config;
pub mod db;
pub mod ingest;
pub mod loader;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod sync;

pub use config::{ConfigDocument, ConfigError, LoaderConfig};
pub use ingest::normalize::{normalize, normalize_all};
pub use loader::{BatchTicket, LoadError, LoadKind, LoadPhase, LoadTicket};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status, LogRotation};
pub use model::contact::{
    Address, Contact, ContactId, ContactSource, ContactStats, Email, PhoneNumber, SourceType,
    UNKNOWN_TIMESTAMP_MS,
};
pub use model::filters::{FiltersPatch, SearchFilters, SortBy, SortOrder};
pub use model::raw::RawContact;
pub use repo::preference_repo::{
    PreferenceRepository, RepoError, RepoResult, SqlitePreferenceRepository,
};
pub use search::query::QueryEngine;
pub use service::contact_service::{ContactService, LoadOutcome};
pub use store::merge::{merge_contacts, MergeOutcome};
pub use store::stats::compute_stats;
pub use sync::provider::{ContactProvider, JsonFileProvider, ProviderError, ProviderResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
