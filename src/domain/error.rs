//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Classification;

/// Domain errors represent invalid menu input.
/// These are independent of document and renderer concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{group} entry '{text}' has an empty key")]
    EmptyKey { group: Classification, text: String },

    #[error("{group} entry '{key}' has no term")]
    MissingTerm { group: Classification, key: String },

    #[error("invalid menu snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
