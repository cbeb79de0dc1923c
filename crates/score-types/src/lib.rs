//! # score-types
//!
//! Shared domain types for the nutriscore system.
//!
//! This crate defines the core data structures used throughout the system:
//! - Messages: Immutable records of conversation turns
//! - Scores: Per-category and aggregate scoring results
//! - Settings: Layered configuration
//! - Errors: Unified error type for scoring operations

pub mod config;
pub mod error;
pub mod message;
pub mod score;

pub use config::{ProviderSettings, Settings, StoreSettings};
pub use error::ScoreError;
pub use message::{Message, MessageRole};
pub use score::{CategoryScore, ScoreResult, MAX_POSSIBLE_SCORE};
