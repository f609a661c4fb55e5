//! Summary statistics over the aggregate.

use crate::model::contact::{Contact, ContactId, ContactStats};
use std::collections::HashSet;

/// Computes stats in one pass; always recomputed wholesale.
///
/// `favorites` counts aggregate records whose id is in the overlay.
pub fn compute_stats(contacts: &[Contact], favorites: &HashSet<ContactId>) -> ContactStats {
    contacts
        .iter()
        .fold(ContactStats::default(), |mut stats, contact| {
            stats.total += 1;
            *stats
                .by_source
                .entry(contact.source.kind.as_str().to_string())
                .or_insert(0) += 1;
            if favorites.contains(&contact.id) {
                stats.favorites += 1;
            }
            if contact.has_photo() {
                stats.with_photos += 1;
            }
            stats
        })
}
