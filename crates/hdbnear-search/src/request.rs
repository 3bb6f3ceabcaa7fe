//! Caller-facing search parameters.

use std::collections::BTreeSet;

use hdbnear_core::Category;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Ordering applied to the final result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Order in which concurrent fetches completed.
    #[default]
    Completion,
    /// Nearest first; ties keep completion order.
    Distance,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completion" | "none" => Ok(SortOrder::Completion),
            "distance" | "nearest" => Ok(SortOrder::Distance),
            other => Err(format!("unknown sort order \"{other}\"")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// Postal code or free-text address.
    pub query: String,
    /// Overrides the configured radius.
    pub radius_km: Option<f64>,
    /// Categories to search; empty means all.
    pub categories: BTreeSet<Category>,
    /// Resale `flat_type` values to match (any of).
    pub flat_types: Vec<String>,
    /// Resale `flat_model` values to match (any of).
    pub flat_models: Vec<String>,
    /// Explicit `YYYY-MM` months for resale queries; defaults to the most
    /// recent configured number of months.
    pub months: Option<Vec<String>>,
    pub sort: SortOrder,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    #[must_use]
    pub fn with_categories<I: IntoIterator<Item = Category>>(mut self, categories: I) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_flat_types<I, S>(mut self, flat_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flat_types = flat_types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_flat_models<I, S>(mut self, flat_models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flat_models = flat_models.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_months<I, S>(mut self, months: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.months = Some(months.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Selected categories, with an empty selection meaning all four.
    #[must_use]
    pub fn effective_categories(&self) -> BTreeSet<Category> {
        if self.categories.is_empty() {
            Category::ALL.into_iter().collect()
        } else {
            self.categories.clone()
        }
    }

    /// Checks the query and resolves the effective radius.
    ///
    /// # Errors
    ///
    /// [`SearchError::EmptyQuery`] for a blank query, or
    /// [`SearchError::InvalidRadius`] for a negative or non-finite radius.
    pub fn validate(&self, default_radius_km: f64) -> Result<f64, SearchError> {
        if self.query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let radius = self.radius_km.unwrap_or(default_radius_km);
        if !radius.is_finite() || radius < 0.0 {
            return Err(SearchError::InvalidRadius(radius));
        }
        Ok(radius)
    }
}
