//! Filter/sort/search pipeline producing the filtered contact view.
//!
//! # Responsibility
//! - Apply, in order: keyword search, source filter, favorites filter, sort.
//! - Annotate results with the favorite overlay.
//!
//! # Invariants
//! - Keywords are AND-combined; an empty query filters nothing.
//! - Sorting is stable, so equal keys keep aggregate order in both directions.
//! - Total over any input; no errors.
//!
//! Name ordering compares lowercased names by code point. It is not locale
//! collation: accented or non-Latin names may sort differently than a
//! platform contact list would show them.

use crate::model::contact::{Contact, ContactId};
use crate::model::filters::{SearchFilters, SortBy, SortOrder};
use crate::search::index::{split_keywords, SearchIndex};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Query engine owning the search index for the current aggregate.
#[derive(Debug, Default)]
pub struct QueryEngine {
    index: SearchIndex,
}

impl QueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the index for a replaced aggregate.
    pub fn reindex(&mut self, contacts: &[Contact]) {
        self.index = SearchIndex::build(contacts);
    }

    /// Indexes records appended to the aggregate.
    pub fn index_appended(&mut self, appended: &[Contact]) {
        self.index.extend(appended);
    }

    pub fn clear(&mut self) {
        self.index.clear();
    }

    pub fn indexed_len(&self) -> usize {
        self.index.len()
    }

    /// Returns aggregate positions of matching records in display order.
    pub fn query_positions(
        &self,
        contacts: &[Contact],
        favorites: &HashSet<ContactId>,
        filters: &SearchFilters,
    ) -> Vec<usize> {
        let index = if self.index.len() == contacts.len() {
            Cow::Borrowed(&self.index)
        } else {
            Cow::Owned(SearchIndex::build(contacts))
        };
        let keywords = split_keywords(&filters.query);

        let mut positions: Vec<usize> = (0..contacts.len())
            .filter(|&position| keywords.is_empty() || index.matches_all(position, &keywords))
            .filter(|&position| {
                filters
                    .source
                    .as_deref()
                    .map_or(true, |source| contacts[position].source.kind.as_str() == source)
            })
            .filter(|&position| {
                !filters.show_favorites_only || favorites.contains(&contacts[position].id)
            })
            .collect();

        positions.sort_by(|&left, &right| {
            let ordering = compare_by(filters.sort_by, &index, contacts, left, right);
            match filters.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        positions
    }

    /// Runs the full pipeline and returns annotated copies.
    pub fn run(
        &self,
        contacts: &[Contact],
        favorites: &HashSet<ContactId>,
        filters: &SearchFilters,
    ) -> Vec<Contact> {
        self.query_positions(contacts, favorites, filters)
            .into_iter()
            .map(|position| annotate(&contacts[position], favorites))
            .collect()
    }
}

/// Returns a copy with `is_favorite` taken from the overlay.
pub fn annotate(contact: &Contact, favorites: &HashSet<ContactId>) -> Contact {
    let mut annotated = contact.clone();
    annotated.is_favorite = favorites.contains(&contact.id);
    annotated
}

fn compare_by(
    sort_by: SortBy,
    index: &SearchIndex,
    contacts: &[Contact],
    left: usize,
    right: usize,
) -> Ordering {
    match sort_by {
        SortBy::Name => index.name_key(left).cmp(index.name_key(right)),
        SortBy::CreatedAt => contacts[left].created_at.cmp(&contacts[right].created_at),
        SortBy::ModifiedAt => contacts[left].modified_at.cmp(&contacts[right].modified_at),
    }
}
