//! Core errors

use thiserror::Error;

/// Errors raised at the domain boundary
///
/// Scoring itself never fails; only malformed required input is rejected,
/// and always before it reaches an engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid argument `{field}`: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

impl CoreError {
    /// Create an invalid-argument error for the given field
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
