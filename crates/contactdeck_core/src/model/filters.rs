//! Query controls for the filtered contact view.
//!
//! # Invariants
//! - `SearchFilters` is the only input to the query engine besides data.
//! - A `source` of `"all"` or blank is stored as `None` (no source filter).

use serde::{Deserialize, Serialize};

/// Sort key for the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Name,
    CreatedAt,
    ModifiedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Current filter/sort state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Free text; whitespace-separated keywords are AND-combined.
    pub query: String,
    /// Exact `SourceType` name to keep, e.g. `"google"`.
    #[serde(default)]
    pub source: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub show_favorites_only: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            query: String::new(),
            source: None,
            sort_by: SortBy::Name,
            sort_order: SortOrder::Asc,
            show_favorites_only: false,
        }
    }
}

impl SearchFilters {
    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: FiltersPatch) {
        if let Some(query) = patch.query {
            self.query = query;
        }
        if let Some(source) = patch.source {
            self.source = normalize_source(source);
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(show_favorites_only) = patch.show_favorites_only {
            self.show_favorites_only = show_favorites_only;
        }
    }
}

/// Partial filter update; `None` fields keep their current value.
///
/// `source: Some(None)` clears the source filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiltersPatch {
    pub query: Option<String>,
    pub source: Option<Option<String>>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub show_favorites_only: Option<bool>,
}

impl FiltersPatch {
    pub fn query(text: impl Into<String>) -> Self {
        Self {
            query: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn source(source: Option<&str>) -> Self {
        Self {
            source: Some(source.map(str::to_string)),
            ..Self::default()
        }
    }

    pub fn sort(sort_by: SortBy, sort_order: SortOrder) -> Self {
        Self {
            sort_by: Some(sort_by),
            sort_order: Some(sort_order),
            ..Self::default()
        }
    }

    pub fn favorites_only(enabled: bool) -> Self {
        Self {
            show_favorites_only: Some(enabled),
            ..Self::default()
        }
    }
}

fn normalize_source(source: Option<String>) -> Option<String> {
    let value = source?;
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return None;
    }
    Some(trimmed.to_string())
}
