use thiserror::Error;

/// Errors that can occur while building names or resolving references.
///
/// The type is `Clone` because a memoized computation hands the same failure
/// to every caller that awaited it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymresError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("binding error: {message} (file: {file}, reference: {reference})")]
    Binding {
        message: String,
        file: String,
        reference: String,
    },

    #[error("computation failed: {message}")]
    Computation { message: String },

    #[error("computation cancelled: {message}")]
    Cancelled { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("snapshot error: {message} (path: {path})")]
    Snapshot { message: String, path: String },
}

impl SymresError {
    /// Shorthand for a [`SymresError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`SymresError::Computation`].
    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation {
            message: message.into(),
        }
    }

    /// Returns `true` for constructor-time validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Convenience alias for results using `SymresError`.
pub type Result<T> = std::result::Result<T, SymresError>;
