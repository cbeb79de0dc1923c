//! The conversation score pipeline.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use score_catalog::Catalog;
use score_embeddings::{Embedding, EmbeddingProvider};
use score_store::{fingerprint, EmbeddingCache, ScoreRepository};
use score_types::{CategoryScore, Message, MessageRole, ScoreError, ScoreResult, MAX_POSSIBLE_SCORE};

use crate::matcher::{Matcher, DEFAULT_SIMILARITY_THRESHOLD};
use crate::scorer::evaluation_summary;

/// Keywords embedded per provider batch during warm-up.
const WARM_UP_BATCH_SIZE: usize = 64;

/// Scores conversations against the category catalog.
///
/// All collaborators are injected: the read-only catalog, an embedding
/// provider, the embedding cache, and the score repository. One service
/// instance is shared across conversations; scoring calls are independent
/// and idempotent for a given message history.
pub struct ScoringService {
    catalog: Arc<Catalog>,
    provider: Arc<dyn EmbeddingProvider>,
    cache: EmbeddingCache,
    scores: ScoreRepository,
    keyword_embeddings: Arc<RwLock<HashMap<String, Embedding>>>,
    matcher: Matcher,
}

impl ScoringService {
    /// Create a service with the default similarity threshold (0.7).
    pub fn new(
        catalog: Arc<Catalog>,
        provider: Arc<dyn EmbeddingProvider>,
        cache: EmbeddingCache,
        scores: ScoreRepository,
    ) -> Self {
        Self::with_similarity_threshold(
            catalog,
            provider,
            cache,
            scores,
            DEFAULT_SIMILARITY_THRESHOLD,
        )
    }

    /// Create a service with a custom similarity threshold.
    pub fn with_similarity_threshold(
        catalog: Arc<Catalog>,
        provider: Arc<dyn EmbeddingProvider>,
        cache: EmbeddingCache,
        scores: ScoreRepository,
        similarity_threshold: f32,
    ) -> Self {
        let keyword_embeddings = Arc::new(RwLock::new(HashMap::new()));
        let matcher = Matcher::new(
            provider.clone(),
            cache.clone(),
            keyword_embeddings.clone(),
            similarity_threshold,
        );

        Self {
            catalog,
            provider,
            cache,
            scores,
            keyword_embeddings,
            matcher,
        }
    }

    /// Precompute embeddings for every catalog keyword.
    ///
    /// Cached embeddings are restored without provider calls; the rest are
    /// fetched in batches and cached. Failures never prevent startup: a
    /// keyword left without an embedding simply has semantic matching
    /// disabled until a later lazy fill.
    pub async fn warm_up_keyword_embeddings(&self) {
        info!("Warming up keyword embeddings");

        let mut missing: Vec<String> = Vec::new();

        for keyword in self.catalog.all_keywords() {
            let keyword_lower = keyword.to_lowercase();
            {
                let map = self.keyword_embeddings.read().await;
                if map.contains_key(&keyword_lower) {
                    continue;
                }
            }

            match self.cache.get(&fingerprint(&keyword_lower)).await {
                Some(embedding) => {
                    let mut map = self.keyword_embeddings.write().await;
                    map.insert(keyword_lower, embedding);
                }
                None => {
                    if !missing.contains(&keyword_lower) {
                        missing.push(keyword_lower);
                    }
                }
            }
        }

        for chunk in missing.chunks(WARM_UP_BATCH_SIZE) {
            match self.provider.embed_batch(chunk).await {
                Ok(embeddings) => {
                    for (keyword, embedding) in chunk.iter().zip(embeddings) {
                        self.cache.put(&fingerprint(keyword), &embedding).await;
                        let mut map = self.keyword_embeddings.write().await;
                        map.insert(keyword.clone(), embedding);
                    }
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        keywords = chunk.len(),
                        "Keyword embedding batch failed; semantic matching disabled for these keywords"
                    );
                }
            }
        }

        let ready = self.keyword_embeddings.read().await.len();
        info!(embeddings = ready, "Keyword embeddings initialized");
    }

    /// Score the user-authored text of a conversation.
    ///
    /// Filters the history to user turns, concatenates their content in
    /// original order, matches every category in catalog order, and
    /// persists the scalar total. A persistence failure surfaces as
    /// [`ScoreError::Persistence`]; the computed result is still valid and
    /// recomputable.
    pub async fn compute_score(
        &self,
        conversation_id: &str,
        messages: &[Message],
    ) -> Result<ScoreResult, ScoreError> {
        let combined_text: String = messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let mut category_scores = Vec::with_capacity(self.catalog.len());
        let mut total_score = 0.0;

        for category in self.catalog.categories() {
            let matched = self.matcher.match_category(&combined_text, category).await;
            total_score += matched.score;

            category_scores.push(CategoryScore {
                category: category.name.clone(),
                score: matched.score,
                max_score: category.max_score,
                matched_keywords: matched.matched_keywords,
            });
        }

        let summary = evaluation_summary(&category_scores, total_score);

        let result = ScoreResult {
            conversation_id: conversation_id.to_string(),
            total_score,
            max_possible_score: MAX_POSSIBLE_SCORE,
            category_scores,
            evaluation_summary: summary,
        };

        self.scores
            .save_total(conversation_id, total_score)
            .await
            .map_err(|e| ScoreError::Persistence(e.to_string()))?;

        info!(
            conversation_id = conversation_id,
            total = total_score,
            "Score calculated"
        );

        Ok(result)
    }

    /// Read back the persisted total for a conversation.
    ///
    /// Only recency can differ from `compute_score`; the method of
    /// computation never does.
    pub async fn get_score(&self, conversation_id: &str) -> f64 {
        self.scores.get_total(conversation_id).await
    }

    /// Number of keyword embeddings currently held in process.
    pub async fn keyword_embedding_count(&self) -> usize {
        self.keyword_embeddings.read().await.len()
    }
}
