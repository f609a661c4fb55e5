//! Aggregate ownership, delta merge and statistics.
//!
//! # Responsibility
//! - Own the in-memory contact set for one session.
//! - Reconcile refresh pulls without dropping local state.
//! - Project summary counts from the aggregate.
//!
//! # Invariants
//! - Contact ids are unique inside the aggregate.
//! - Statistics are a pure projection, never patched incrementally.

pub mod aggregate;
pub mod merge;
pub mod stats;
