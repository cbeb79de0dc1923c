//! # score-store
//!
//! Key-value persistence for nutriscore.
//!
//! Provides:
//! - `KvStore`: async trait over the external key-value service
//!   (get/set with TTL, delete, list append and range)
//! - `RedisStore`: Redis-backed implementation
//! - `MemoryStore`: in-process implementation for tests and offline use
//! - `EmbeddingCache`: content-hash keyed embedding memoization with a
//!   finite retention window; reads degrade to miss, writes are best-effort
//! - `ScoreRepository`: durable storage for the scalar total score

pub mod cache;
pub mod error;
pub mod kv;
pub mod redis_store;
pub mod scores;

pub use cache::{fingerprint, EmbeddingCache, DEFAULT_EMBEDDING_TTL};
pub use error::StoreError;
pub use kv::{KvStore, MemoryStore};
pub use redis_store::RedisStore;
pub use scores::{ScoreRepository, DEFAULT_SCORE_TTL};
