//! Error types for graph construction and persistence.

use thiserror::Error;

/// Errors surfaced by the graph's public operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The caller passed an argument the operation cannot honor
    /// (self loop, empty connection set, non-finite coordinate, ...).
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input.
        reason: String,
    },

    /// A persisted document was rejected by the strict loader.
    #[error("persist error [{code}]: {message}")]
    Persist {
        /// Stable machine-readable code, e.g. `invalid_structure`.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },
}

impl GraphError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        GraphError::InvalidArgument { reason: reason.into() }
    }

    pub(crate) fn persist(code: &'static str, message: impl Into<String>) -> Self {
        GraphError::Persist { code, message: message.into() }
    }

    /// Stable short code, used by bindings.
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::InvalidArgument { .. } => "invalid_argument",
            GraphError::Persist { code, .. } => code,
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
