//! Filter criteria for the proposal list.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::{ParseVariantError, ProposalStatus};

/// Wildcard token accepted wherever a category or status filter is parsed.
pub const WILDCARD: &str = "all";

/// Category part of the criteria: everything, or one catalog id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse `"all"` as the wildcard and anything else as a catalog id.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == WILDCARD {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => id == category,
        }
    }
}

/// Status part of the criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProposalStatus),
}

impl StatusFilter {
    pub fn parse(value: &str) -> Result<Self, ParseVariantError> {
        let value = value.trim();
        if value.is_empty() || value == WILDCARD {
            Ok(Self::All)
        } else {
            value.parse().map(Self::Only)
        }
    }

    pub fn matches(&self, status: ProposalStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

/// What the proposal list is narrowed to.
///
/// The default value matches every proposal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct FilterCriteria {
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub status: StatusFilter,
    /// Case-insensitive substring; empty matches everything
    #[serde(default)]
    pub search: String,
}

impl FilterCriteria {
    /// Criteria that match every proposal.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// True when no part of the criteria narrows the list.
    pub fn is_unfiltered(&self) -> bool {
        self.category == CategoryFilter::All
            && self.status == StatusFilter::All
            && self.search.is_empty()
    }
}
