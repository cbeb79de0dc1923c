//! # score-embeddings
//!
//! Text embeddings for semantic keyword matching.
//!
//! This crate defines the `EmbeddingProvider` trait consumed by the scoring
//! engine, the `Embedding` vector type with cosine similarity, an
//! OpenAI-compatible HTTP provider, and a deterministic mock for tests.
//!
//! Embeddings are an enhancement, never a hard dependency: every provider
//! call signals failure per-call via `Result`, and callers degrade to
//! literal-only matching when a call fails.

pub mod error;
pub mod mock;
pub mod model;
pub mod openai;

pub use error::EmbeddingError;
pub use mock::MockEmbedder;
pub use model::{Embedding, EmbeddingProvider};
pub use openai::{OpenAiEmbedder, OpenAiEmbedderConfig};
