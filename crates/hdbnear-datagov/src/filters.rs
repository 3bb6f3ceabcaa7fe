//! Exact-match datastore filters and pagination.

use std::collections::BTreeMap;

use serde::Serialize;

/// Default page size for datastore queries.
pub const DEFAULT_PAGE_LIMIT: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(String),
    /// Matches any of the listed values.
    Many(Vec<String>),
}

/// Column filters for `datastore_search`.
///
/// Keys are kept sorted so the serialized `filters` parameter is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, FilterValue>);

impl Filters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `column` to equal `value`.
    #[must_use]
    pub fn exact(mut self, column: &str, value: impl Into<String>) -> Self {
        self.0
            .insert(column.to_string(), FilterValue::One(value.into()));
        self
    }

    /// Requires `column` to equal one of `values`. An empty list adds no
    /// constraint; a single value collapses to an exact match.
    #[must_use]
    pub fn any_of<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        match values.len() {
            0 => {}
            1 => {
                let value = values.remove(0);
                self.0.insert(column.to_string(), FilterValue::One(value));
            }
            _ => {
                self.0.insert(column.to_string(), FilterValue::Many(values));
            }
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&FilterValue> {
        self.0.get(column)
    }

    /// JSON for the `filters` query parameter, or `None` when unfiltered.
    #[must_use]
    pub fn to_query(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        serde_json::to_string(&self.0).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    #[must_use]
    pub fn first(limit: u32) -> Self {
        Self { limit, offset: 0 }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_LIMIT)
    }
}
