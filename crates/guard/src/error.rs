//! Login guard errors

use thiserror::Error;

/// Errors from the login guard
///
/// Guard decisions never fail; these only surface while loading
/// configuration or attempt logs.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type for login guard operations
pub type GuardResult<T> = Result<T, GuardError>;
