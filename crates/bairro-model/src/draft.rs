//! Unvalidated proposal input and its validation.
//!
//! The presentation layer fills a [`ProposalDraft`]; the store only accepts
//! the [`ValidDraft`] produced by [`ProposalDraft::validate`].

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::catalog::CategoryCatalog;
use crate::types::{Coordinate, Priority};
use crate::validation::ValidationErrors;

/// Proposal fields as typed by the author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ProposalDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Catalog id
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    /// Defaults to medium when absent
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl ProposalDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinate = Some(Coordinate::new(latitude, longitude));
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Check every field against the catalog, collecting all failures.
    pub fn validate(&self, catalog: &CategoryCatalog) -> Result<ValidDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", "title is required");
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.push("description", "description is required");
        }

        let category = self.category.trim();
        if category.is_empty() {
            errors.push("category", "category is required");
        } else if !catalog.contains(category) {
            errors.push("category", format!("unknown category '{category}'"));
        }

        let address = self.address.trim();
        if address.is_empty() {
            errors.push("address", "address is required");
        }

        let coordinate = match self.coordinate {
            None => {
                errors.push("coordinate", "location is required");
                None
            }
            Some(c) if !c.is_valid() => {
                errors.push("coordinate", "latitude or longitude out of range");
                None
            }
            Some(c) => Some(c),
        };

        errors.into_result()?;
        let Some(coordinate) = coordinate else {
            return Err(ValidationErrors::single("coordinate", "location is required"));
        };

        Ok(ValidDraft {
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            address: address.to_string(),
            coordinate,
            priority: self.priority.unwrap_or_default(),
        })
    }
}

/// A draft that passed validation; fields are trimmed.
///
/// Only [`ProposalDraft::validate`] can construct one.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ValidDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub priority: Priority,
}
