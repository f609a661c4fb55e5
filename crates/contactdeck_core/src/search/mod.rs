//! Contact search and query pipeline.
//!
//! # Responsibility
//! - Keep an in-memory index aligned with the visible aggregate.
//! - Produce the filtered, sorted view for the current `SearchFilters`.
//!
//! # Invariants
//! - Every filter change recomputes synchronously; nothing is debounced here.

pub mod index;
pub mod query;
