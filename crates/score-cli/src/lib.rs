//! # score-cli
//!
//! Demo harness for the nutriscore scoring engine.
//!
//! Scores JSON transcripts against the healthy-eating catalog and prints
//! the per-category breakdown. Runs fully offline by default (in-process
//! store, deterministic embeddings); `--live` switches to Redis and the
//! configured embedding provider.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{handle_catalog, handle_get_score, handle_score};
