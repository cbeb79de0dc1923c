//! Durable storage for computed totals.
//!
//! Only the scalar total score is persisted per conversation; the detailed
//! breakdown is recomputed from the message history on demand.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::kv::KvStore;

/// Key prefix for persisted scores.
const SCORE_PREFIX: &str = "score:";

/// Default retention window for persisted scores: 24 hours.
pub const DEFAULT_SCORE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Repository for per-conversation total scores.
#[derive(Clone)]
pub struct ScoreRepository {
    store: Arc<dyn KvStore>,
    ttl: Duration,
}

impl ScoreRepository {
    /// Create a repository with the default 24-hour retention window.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_ttl(store, DEFAULT_SCORE_TTL)
    }

    /// Create a repository with a custom retention window.
    pub fn with_ttl(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Persist the total score for a conversation.
    ///
    /// Unlike cache writes, failures here propagate: the caller must know
    /// the computed result was not durably recorded.
    pub async fn save_total(&self, conversation_id: &str, total: f64) -> Result<(), StoreError> {
        let key = format!("{SCORE_PREFIX}{conversation_id}");
        self.store
            .set(&key, &total.to_string(), Some(self.ttl))
            .await?;
        debug!(conversation_id = conversation_id, total = total, "Score saved");
        Ok(())
    }

    /// Read back the persisted total for a conversation.
    ///
    /// Missing or unreadable values yield 0.0.
    pub async fn get_total(&self, conversation_id: &str) -> f64 {
        let key = format!("{SCORE_PREFIX}{conversation_id}");

        let value = match self.store.get(&key).await {
            Ok(Some(value)) => value,
            Ok(None) => return 0.0,
            Err(e) => {
                warn!(error = %e, conversation_id = conversation_id, "Score read failed");
                return 0.0;
            }
        };

        match value.parse::<f64>() {
            Ok(total) => total,
            Err(e) => {
                warn!(error = %e, conversation_id = conversation_id, "Stored score unreadable");
                0.0
            }
        }
    }
}
