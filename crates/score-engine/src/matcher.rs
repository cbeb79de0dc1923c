//! Keyword matching for a single category.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use score_catalog::Category;
use score_embeddings::{Embedding, EmbeddingError, EmbeddingProvider};
use score_store::{fingerprint, EmbeddingCache};

use crate::scorer::step_score;

/// Literal matches at or above this count skip the semantic phase.
pub const SEMANTIC_TRIGGER_THRESHOLD: usize = 3;

/// Default cosine similarity threshold for a semantic match.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.7;

/// Outcome of matching one text block against one category.
#[derive(Debug, Clone)]
pub struct CategoryMatch {
    /// Matched keywords, lower-cased, deduplicated, in keyword-list order
    pub matched_keywords: Vec<String>,

    /// Step-function score derived from the match count
    pub score: f64,
}

/// Matches text against category keywords.
///
/// The shared keyword-embedding map is read-mostly after warm-up; misses
/// are lazily filled from the cache (never the provider) during matching,
/// last-writer-wins.
pub struct Matcher {
    provider: Arc<dyn EmbeddingProvider>,
    cache: EmbeddingCache,
    keyword_embeddings: Arc<RwLock<HashMap<String, Embedding>>>,
    similarity_threshold: f32,
}

impl Matcher {
    /// Create a matcher over the given collaborators.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        cache: EmbeddingCache,
        keyword_embeddings: Arc<RwLock<HashMap<String, Embedding>>>,
        similarity_threshold: f32,
    ) -> Self {
        Self {
            provider,
            cache,
            keyword_embeddings,
            similarity_threshold,
        }
    }

    /// Match `text` against one category and score the result.
    ///
    /// Literal phase first: exact substring containment, case-insensitive,
    /// with no word-boundary checks. This deliberately permits matches on
    /// partial-word overlaps (e.g. "su" inside unrelated words); changing
    /// it would alter scoring outcomes.
    ///
    /// The semantic phase runs only when fewer than three literal matches
    /// were found, and costs one embedding lookup for the whole text. An
    /// embedding failure downgrades to the literal-only result.
    pub async fn match_category(&self, text: &str, category: &Category) -> CategoryMatch {
        let text_lower = text.to_lowercase();
        let mut matched: Vec<String> = Vec::new();

        for keyword in &category.keywords {
            let keyword_lower = keyword.to_lowercase();
            if text_lower.contains(&keyword_lower) && !matched.contains(&keyword_lower) {
                matched.push(keyword_lower);
            }
        }

        if matched.len() < SEMANTIC_TRIGGER_THRESHOLD {
            match self.text_embedding(&text_lower).await {
                Ok(text_embedding) => {
                    self.semantic_matches(&text_embedding, category, &mut matched)
                        .await;
                }
                Err(e) => {
                    warn!(
                        category = %category.name,
                        error = %e,
                        "Semantic matching unavailable, keeping literal matches"
                    );
                }
            }
        }

        let score = step_score(matched.len(), category.max_score);

        debug!(
            category = %category.name,
            matches = matched.len(),
            score = score,
            "Category matched"
        );

        CategoryMatch {
            matched_keywords: matched,
            score,
        }
    }

    /// Embedding for the analyzed text, read through the cache.
    async fn text_embedding(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let hash = fingerprint(text);

        if let Some(embedding) = self.cache.get(&hash).await {
            return Ok(embedding);
        }

        let embedding = self.provider.embed(text).await?;
        self.cache.put(&hash, &embedding).await;
        Ok(embedding)
    }

    /// Add semantically similar keywords to `matched`.
    ///
    /// Keywords without a known embedding are skipped; a cache hit fills
    /// the shared map for subsequent calls.
    async fn semantic_matches(
        &self,
        text_embedding: &Embedding,
        category: &Category,
        matched: &mut Vec<String>,
    ) {
        for keyword in &category.keywords {
            let keyword_lower = keyword.to_lowercase();
            if matched.contains(&keyword_lower) {
                continue;
            }

            let known = {
                let map = self.keyword_embeddings.read().await;
                map.get(&keyword_lower).cloned()
            };

            let keyword_embedding = match known {
                Some(embedding) => embedding,
                None => match self.cache.get(&fingerprint(&keyword_lower)).await {
                    Some(embedding) => {
                        let mut map = self.keyword_embeddings.write().await;
                        map.insert(keyword_lower.clone(), embedding.clone());
                        embedding
                    }
                    None => continue,
                },
            };

            let similarity = text_embedding.cosine_similarity(&keyword_embedding);
            if similarity >= self.similarity_threshold {
                debug!(
                    keyword = %keyword_lower,
                    similarity = similarity,
                    "Semantic match"
                );
                matched.push(keyword_lower);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use score_catalog::Catalog;
    use score_embeddings::MockEmbedder;
    use score_store::MemoryStore;

    fn literal_only_matcher() -> Matcher {
        Matcher::new(
            Arc::new(MockEmbedder::failing()),
            EmbeddingCache::new(Arc::new(MemoryStore::new())),
            Arc::new(RwLock::new(HashMap::new())),
            DEFAULT_SIMILARITY_THRESHOLD,
        )
    }

    fn category(name: &str) -> Category {
        Catalog::healthy_eating()
            .categories()
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_literal_matching_is_case_insensitive() {
        let matcher = literal_only_matcher();
        let hydration = category("Hydration");

        let result = matcher
            .match_category("WATER and Hydration and DRINK", &hydration)
            .await;
        assert!(result.matched_keywords.contains(&"water".to_string()));
        assert!(result.matched_keywords.contains(&"hydration".to_string()));
        assert!(result.matched_keywords.contains(&"drink".to_string()));
        assert_eq!(result.score, hydration.max_score);
    }

    #[tokio::test]
    async fn test_substring_matching_has_no_word_boundaries() {
        let matcher = literal_only_matcher();
        let hydration = category("Hydration");

        // "su" (Turkish for water) matches inside "sushi".
        let result = matcher.match_category("we ordered sushi", &hydration).await;
        assert!(result.matched_keywords.contains(&"su".to_string()));
    }

    #[tokio::test]
    async fn test_matches_are_deduplicated() {
        let matcher = literal_only_matcher();
        let hydration = category("Hydration");

        let result = matcher
            .match_category("water Water WATER water", &hydration)
            .await;
        let water_count = result
            .matched_keywords
            .iter()
            .filter(|k| *k == "water")
            .count();
        assert_eq!(water_count, 1);
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_literal_matches() {
        let matcher = literal_only_matcher();
        let hydration = category("Hydration");

        let result = matcher.match_category("I drink water", &hydration).await;
        // "water" and "drink" literally; provider failure must not zero them.
        assert_eq!(result.matched_keywords.len(), 2);
        assert_eq!(result.score, 0.7 * hydration.max_score);
    }

    #[tokio::test]
    async fn test_semantic_phase_skipped_with_three_literal_matches() {
        let mock = Arc::new(MockEmbedder::new());
        let matcher = Matcher::new(
            mock.clone(),
            EmbeddingCache::new(Arc::new(MemoryStore::new())),
            Arc::new(RwLock::new(HashMap::new())),
            DEFAULT_SIMILARITY_THRESHOLD,
        );
        let hydration = category("Hydration");

        matcher
            .match_category("water drink hydration", &hydration)
            .await;
        assert_eq!(mock.embed_calls(), 0);
    }

    #[tokio::test]
    async fn test_semantic_match_above_threshold() {
        let mock = Arc::new(
            MockEmbedder::new()
                .with_vector("parched after the run", vec![1.0, 0.0])
                .with_vector("hydration", vec![1.0, 0.0])
                .with_vector("water", vec![0.0, 1.0]),
        );

        let keyword_embeddings = Arc::new(RwLock::new(HashMap::new()));
        {
            let mut map = keyword_embeddings.write().await;
            map.insert("hydration".to_string(), Embedding::new(vec![1.0, 0.0]));
            map.insert("water".to_string(), Embedding::new(vec![0.0, 1.0]));
        }

        let matcher = Matcher::new(
            mock,
            EmbeddingCache::new(Arc::new(MemoryStore::new())),
            keyword_embeddings,
            DEFAULT_SIMILARITY_THRESHOLD,
        );
        let hydration = category("Hydration");

        let result = matcher
            .match_category("parched after the run", &hydration)
            .await;
        assert_eq!(result.matched_keywords, vec!["hydration".to_string()]);
        assert_eq!(result.score, 0.4 * hydration.max_score);
    }

    #[tokio::test]
    async fn test_lazy_fill_from_cache() {
        let store = Arc::new(MemoryStore::new());
        let cache = EmbeddingCache::new(store);
        cache
            .put(&fingerprint("hydration"), &Embedding::new(vec![1.0, 0.0]))
            .await;

        let mock = Arc::new(MockEmbedder::new().with_vector("feeling parched", vec![1.0, 0.0]));
        let keyword_embeddings = Arc::new(RwLock::new(HashMap::new()));
        let matcher = Matcher::new(
            mock,
            cache,
            keyword_embeddings.clone(),
            DEFAULT_SIMILARITY_THRESHOLD,
        );
        let hydration = category("Hydration");

        let result = matcher.match_category("feeling parched", &hydration).await;
        assert!(result.matched_keywords.contains(&"hydration".to_string()));

        // The cache hit filled the shared map.
        let map = keyword_embeddings.read().await;
        assert!(map.contains_key("hydration"));
    }
}
