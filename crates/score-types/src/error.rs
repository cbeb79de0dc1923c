//! Error types for the nutriscore system.

use thiserror::Error;

/// Unified error type for scoring operations.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Score could not be durably recorded (the computed result is still valid)
    #[error("Failed to persist score: {0}")]
    Persistence(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
