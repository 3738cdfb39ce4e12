//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{Classification, DomainError};
use crate::infrastructure::traits::{DocumentError, RenderError};

/// Application errors wrap domain errors and add engine-level context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("render of '{key}' with template {template} failed")]
    RenderFailure {
        template: String,
        key: String,
        #[source]
        source: RenderError,
    },

    #[error("no {group} header for term '{term}' (entry '{key}')")]
    MissingHeader {
        term: String,
        group: Classification,
        key: String,
    },

    #[error("anchor node not found: {0}")]
    AnchorNotFound(String),

    #[error("document operation failed: {0}")]
    Document(#[from] DocumentError),

    #[error("menu initialisation already in progress")]
    Busy,

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// Errors that cost one node or one group but leave the rest of the
    /// menu usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ApplicationError::RenderFailure { .. }
                | ApplicationError::MissingHeader { .. }
                | ApplicationError::Document(DocumentError::NodeGone(_))
        )
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
