//! Embedding memoization over the key-value store.
//!
//! Entries are keyed by a content fingerprint of the lower-cased text and
//! retained for a finite window. Caching is strictly best-effort: store
//! errors and corrupt payloads on read are treated as a miss, and write
//! failures are logged and swallowed. A miss always falls back to
//! recomputation at the call site.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use score_embeddings::Embedding;

use crate::kv::KvStore;

/// Key prefix for cached embeddings.
const EMBEDDING_PREFIX: &str = "embedding:";

/// Default retention window for cached embeddings: 7 days.
pub const DEFAULT_EMBEDDING_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Case-insensitive content fingerprint: 128-bit digest of the
/// lower-cased text, hex-encoded.
pub fn fingerprint(text: &str) -> String {
    format!("{:x}", md5::compute(text.to_lowercase().as_bytes()))
}

/// Read-through cache for embedding vectors.
#[derive(Clone)]
pub struct EmbeddingCache {
    store: Arc<dyn KvStore>,
    ttl: Duration,
}

impl EmbeddingCache {
    /// Create a cache with the default 7-day retention window.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_ttl(store, DEFAULT_EMBEDDING_TTL)
    }

    /// Create a cache with a custom retention window.
    pub fn with_ttl(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Look up a cached embedding by fingerprint.
    ///
    /// Store errors and undecodable payloads degrade to `None`.
    pub async fn get(&self, fingerprint: &str) -> Option<Embedding> {
        let key = format!("{EMBEDDING_PREFIX}{fingerprint}");

        let payload = match self.store.get(&key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, key = %key, "Embedding cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<Vec<f32>>(&payload) {
            Ok(values) => {
                debug!(key = %key, "Embedding cache hit");
                Some(Embedding::new(values))
            }
            Err(e) => {
                warn!(error = %e, key = %key, "Corrupt cached embedding, treating as miss");
                None
            }
        }
    }

    /// Store an embedding, best-effort.
    pub async fn put(&self, fingerprint: &str, embedding: &Embedding) {
        let key = format!("{EMBEDDING_PREFIX}{fingerprint}");

        let payload = match serde_json::to_string(&embedding.values) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, key = %key, "Failed to encode embedding for caching");
                return;
            }
        };

        if let Err(e) = self.store.set(&key, &payload, Some(self.ttl)).await {
            warn!(error = %e, key = %key, "Embedding cache write failed");
        }
    }
}
