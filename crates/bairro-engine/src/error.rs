//! Error type shared by every engine operation.

use bairro_model::{ProposalId, ValidationErrors};

/// Errors returned by the engine.
///
/// None of these are fatal: each is handled at the call site.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The action needs a signed-in member
    #[error("Authentication required")]
    Unauthenticated,

    /// Input was rejected; carries one message per field
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// No proposal with this id
    #[error("Proposal not found: {0}")]
    NotFound(ProposalId),

    /// A stored proposal names a category missing from the catalog
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl EngineError {
    /// Field-level messages, when this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
