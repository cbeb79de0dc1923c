//! Store error types.

use thiserror::Error;

/// Errors from key-value store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Redis command or connection error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Backend-agnostic store failure
    #[error("Store error: {0}")]
    Backend(String),
}
