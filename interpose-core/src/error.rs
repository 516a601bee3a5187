//! Error types for dispatch and interception.

use thiserror::Error;

/// Errors surfaced by operation dispatch.
///
/// Failures raised by an operation body travel through wrappers unchanged:
/// the value a caller receives is the value the body returned.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InterposeError {
    /// No operation is defined under this name.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The caller passed a different number of arguments than the
    /// operation declares.
    #[error("arity mismatch for {name}: expected {expected}, got {got}")]
    ArityMismatch {
        /// Operation that was invoked.
        name: String,
        /// Declared argument count.
        expected: usize,
        /// Argument count actually passed.
        got: usize,
    },

    /// An operation body (or a chain callback) failed.
    #[error("operation {name} failed: {message}")]
    Operation {
        /// Operation that raised the failure.
        name: String,
        /// Error message.
        message: String,
    },

    /// The result could not be decoded into the requested type.
    #[error("decode error: {0}")]
    Decode(String),

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl InterposeError {
    /// Shorthand for an [`InterposeError::Operation`] failure.
    pub fn operation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Operation {
            name: name.into(),
            message: message.into(),
        }
    }
}
