//! Error types for the content resolution engine.
//!
//! The resolution core itself never fails; these cover the collaborators around it.

use thiserror::Error;

/// Failures reported by a query executor implementation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Query timed out after {0} ms")]
    Timeout(u64),

    #[error("Unsupported query: {0}")]
    Unsupported(String),
}

/// Errors from the ambient surfaces: configuration and logging setup
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration:\n{0}")]
    ValidationFailed(String),

    #[error("Logging setup failed: {0}")]
    LoggingError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}
