//! In-memory search index over the visible aggregate.
//!
//! # Responsibility
//! - Precompute case-folded searchable text and name sort keys per record so
//!   a filter change never re-derives them.
//!
//! # Invariants
//! - Entry `i` describes aggregate record `i`; the index is appended to as
//!   batches are released and rebuilt when the aggregate is replaced.

use crate::model::contact::Contact;

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexEntry {
    haystack: String,
    name_key: String,
}

impl IndexEntry {
    fn from_contact(contact: &Contact) -> Self {
        Self {
            haystack: searchable_text(contact),
            name_key: contact.name.to_lowercase(),
        }
    }
}

/// Positional index aligned with an aggregate slice.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(contacts: &[Contact]) -> Self {
        let mut index = Self::new();
        index.extend(contacts);
        index
    }

    /// Appends entries for newly released records.
    pub fn extend(&mut self, contacts: &[Contact]) {
        self.entries
            .extend(contacts.iter().map(IndexEntry::from_contact));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether record `position` contains every keyword.
    ///
    /// Keywords must already be case-folded (see [`split_keywords`]).
    pub fn matches_all(&self, position: usize, keywords: &[String]) -> bool {
        self.entries.get(position).is_some_and(|entry| {
            keywords
                .iter()
                .all(|keyword| entry.haystack.contains(keyword.as_str()))
        })
    }

    /// Case-folded name used for ordering.
    pub fn name_key(&self, position: usize) -> &str {
        self.entries
            .get(position)
            .map_or("", |entry| entry.name_key.as_str())
    }
}

/// Splits a free-text query into case-folded, non-empty keywords.
pub fn split_keywords(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Case-folded concatenation of every searchable field.
pub fn searchable_text(contact: &Contact) -> String {
    let mut parts: Vec<&str> = vec![contact.name.as_str()];
    parts.extend(
        [
            contact.first_name.as_deref(),
            contact.last_name.as_deref(),
            contact.company.as_deref(),
            contact.job_title.as_deref(),
            contact.notes.as_deref(),
        ]
        .into_iter()
        .flatten(),
    );
    parts.extend(contact.phone_numbers.iter().map(|phone| phone.number.as_str()));
    parts.extend(contact.emails.iter().map(|email| email.email.as_str()));
    parts.join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::split_keywords;

    #[test]
    fn split_keywords_drops_empty_tokens_and_folds_case() {
        assert_eq!(split_keywords("  Ann \t ACME  "), vec!["ann", "acme"]);
        assert!(split_keywords("   ").is_empty());
    }
}
