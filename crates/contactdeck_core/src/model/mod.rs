//! Domain model for the contact engine.
//!
//! # Responsibility
//! - Define the canonical `Contact` shape and its summary statistics.
//! - Define the raw external record shape accepted by ingestion.
//! - Define the filter/sort controls consumed by the query engine.
//!
//! # Invariants
//! - Every contact is identified by a stable external `ContactId`.
//! - Favorite state lives in an overlay owned by the service, not the source.

pub mod contact;
pub mod filters;
pub mod raw;
