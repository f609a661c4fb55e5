//! Repository layer for persisted preferences.
//!
//! # Responsibility
//! - Define the preference persistence contract used by the service.
//! - Keep SQL details out of service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`InvalidData`) in addition to DB
//!   transport errors.

pub mod preference_repo;
