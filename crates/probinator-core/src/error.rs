//! Error types for the probinator harness

use thiserror::Error;

/// Main error type for harness-internal failures.
///
/// Service-level failures observed through the call surface are not errors;
/// they are data (`Outcome::Failure`) and stay below the probe boundary.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error with context
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-layer error outside any probe (e.g. client bootstrap)
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        HarnessError::Serialization(err.to_string())
    }
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
