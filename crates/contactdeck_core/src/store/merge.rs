//! Delta-sync merge of a fresh pull into the existing aggregate.
//!
//! # Invariants
//! - An incoming record replaces the existing one only when its
//!   `modified_at` is strictly greater; ties keep the existing record.
//! - Records missing from the incoming pull are kept (additive merge).
//! - Existing records keep their positions; new ids are appended in pull order.

use crate::model::contact::{Contact, ContactId};
use std::collections::HashMap;

/// Merge result with counters for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub contacts: Vec<Contact>,
    /// Existing records superseded by a strictly newer incoming version.
    pub replaced: usize,
    /// Incoming ids not present before.
    pub added: usize,
    /// Incoming records ignored because they were not newer.
    pub kept: usize,
}

/// Merges `incoming` into `existing`.
///
/// Duplicate ids inside `existing` collapse onto their first occurrence;
/// duplicates inside `incoming` follow the same strictly-newer rule in order.
pub fn merge_contacts(existing: Vec<Contact>, incoming: Vec<Contact>) -> MergeOutcome {
    let mut merged: Vec<Contact> = Vec::with_capacity(existing.len().max(incoming.len()));
    let mut positions: HashMap<ContactId, usize> = HashMap::with_capacity(merged.capacity());

    for contact in existing {
        if positions.contains_key(&contact.id) {
            continue;
        }
        positions.insert(contact.id.clone(), merged.len());
        merged.push(contact);
    }

    let mut replaced = 0;
    let mut added = 0;
    let mut kept = 0;

    for contact in incoming {
        match positions.get(&contact.id) {
            Some(&position) => {
                if contact.modified_at > merged[position].modified_at {
                    merged[position] = contact;
                    replaced += 1;
                } else {
                    kept += 1;
                }
            }
            None => {
                positions.insert(contact.id.clone(), merged.len());
                merged.push(contact);
                added += 1;
            }
        }
    }

    MergeOutcome {
        contacts: merged,
        replaced,
        added,
        kept,
    }
}
