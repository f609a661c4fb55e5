//! Ingestion of raw directory records.
//!
//! # Responsibility
//! - Turn facility-shaped records into canonical contacts.
//!
//! # Invariants
//! - Malformed raw records are defaulted, never rejected or dropped.

pub mod normalize;
