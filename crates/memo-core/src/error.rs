//! Error types for the memo cache

use thiserror::Error;

/// Result type alias for cache operations
pub type MemoResult<T> = Result<T, MemoError>;

/// Main error type for the memo cache
///
/// Most callers never see these: the hook entry points swallow every
/// failure and degrade to a cache miss. The variants exist for internal
/// plumbing and for the maintenance commands, which do report errors.
#[derive(Error, Debug, Clone)]
pub enum MemoError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MemoError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<std::io::Error> for MemoError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for MemoError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}
