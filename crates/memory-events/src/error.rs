//! Error types for memory lifecycle events.

use thiserror::Error;

/// Unified error type for event construction, encoding and decoding.
#[derive(Debug, Error)]
pub enum EventError {
    /// Event is missing a required field, has a mistyped field
    /// or carries an unusable discriminator
    #[error("Validation error: {0}")]
    Validation(String),

    /// Input bytes are not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EventError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        EventError::Validation(message.into())
    }

    /// Whether this error rejects the event itself rather than its encoding
    pub fn is_validation(&self) -> bool {
        matches!(self, EventError::Validation(_))
    }
}
