//! Review engine errors

use thiserror::Error;

/// Errors from the review engine
///
/// Scoring and evaluation are infallible; these only surface while loading
/// configuration or case history.
#[derive(Debug, Error)]
pub enum RiskError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type for review engine operations
pub type RiskResult<T> = Result<T, RiskError>;
