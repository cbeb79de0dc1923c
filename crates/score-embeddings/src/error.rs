//! Embedding error types.

use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// API request failed
    #[error("API request failed: {0}")]
    Api(String),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Timeout waiting for response
    #[error("Timeout waiting for response")]
    Timeout,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Nothing to embed
    #[error("Empty input")]
    EmptyInput,
}
