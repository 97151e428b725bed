//! Data model for Meu Bairro, a community board for neighborhood-improvement
//! proposals.
//!
//! This crate holds the value types shared by the proposal engine and the
//! presentation layer:
//!
//! - [`Proposal`], [`Comment`], [`User`]: the records the engine owns
//! - [`CategoryCatalog`]: the static category reference data
//! - [`FilterCriteria`]: what the proposal list is currently narrowed to
//! - [`ProposalDraft`]: unvalidated input for creating a proposal
//! - [`ValidationErrors`]: field-level messages for rejected input
//!
//! With the `typescript` feature enabled the public types derive `ts_rs::TS`
//! so the web frontend can consume the same shapes.

pub mod catalog;
pub mod criteria;
pub mod draft;
pub mod ids;
pub mod types;
pub mod validation;

pub use catalog::{Category, CategoryCatalog};
pub use criteria::{CategoryFilter, FilterCriteria, StatusFilter};
pub use draft::{ProposalDraft, ValidDraft};
pub use ids::{CommentId, ProposalId, UserId};
pub use types::*;
pub use validation::{FieldError, ValidationErrors};
