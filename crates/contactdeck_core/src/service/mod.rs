//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate loader, store, query engine and preference repository into
//!   the session-level API collaborators call.
//! - Keep UI layers decoupled from storage and retrieval details.

pub mod contact_service;
