//! Boundary to the external contact directory.
//!
//! # Responsibility
//! - Abstract the device retrieval facility behind `ContactProvider`.
//!
//! # Invariants
//! - Providers never see or mutate the aggregate.

pub mod provider;
