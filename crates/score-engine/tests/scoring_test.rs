//! End-to-end scoring pipeline tests with mock collaborators.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use score_catalog::Catalog;
use score_embeddings::{EmbeddingProvider, MockEmbedder};
use score_engine::ScoringService;
use score_store::{EmbeddingCache, KvStore, MemoryStore, ScoreRepository, StoreError};
use score_types::{Message, ScoreError};

fn service_with(provider: Arc<dyn EmbeddingProvider>, store: Arc<dyn KvStore>) -> ScoringService {
    ScoringService::new(
        Arc::new(Catalog::healthy_eating()),
        provider,
        EmbeddingCache::new(store.clone()),
        ScoreRepository::new(store),
    )
}

fn mock_service() -> ScoringService {
    service_with(Arc::new(MockEmbedder::new()), Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_literal_fixture_scores_fruits_and_hydration() {
    let service = mock_service();

    let messages = vec![Message::user(
        "I eat fruits and vegetables every day. I drink 8 glasses of water.",
    )];
    let result = service.compute_score("conv-1", &messages).await.unwrap();

    assert_eq!(result.category_scores.len(), 5);

    let fruits = &result.category_scores[0];
    assert_eq!(fruits.category, "Fruits & Vegetables");
    assert!(fruits.matched_keywords.len() >= 3);
    assert_eq!(fruits.score, 20.0);

    let hydration = &result.category_scores[1];
    assert_eq!(hydration.category, "Hydration");
    assert!(hydration.matched_keywords.len() >= 3);
    assert_eq!(hydration.score, 20.0);

    let sum: f64 = result.category_scores.iter().map(|cs| cs.score).sum();
    assert_eq!(result.total_score, sum);
    assert_eq!(result.max_possible_score, 100.0);
}

#[tokio::test]
async fn test_scores_are_always_step_function_values() {
    let service = mock_service();

    let texts = [
        "I eat fruits and vegetables every day. I drink 8 glasses of water.",
        "protein and carbs",
        "sugar",
        "nothing relevant whatsoever",
        "breakfast lunch dinner snack metabolism",
    ];

    for text in texts {
        let messages = vec![Message::user(text)];
        let result = service.compute_score("conv-steps", &messages).await.unwrap();

        for cs in &result.category_scores {
            let allowed = [0.0, 0.4 * cs.max_score, 0.7 * cs.max_score, cs.max_score];
            assert!(
                allowed.iter().any(|v| (cs.score - v).abs() < 1e-9),
                "unexpected score {} for {} on {:?}",
                cs.score,
                cs.category,
                text
            );
        }
    }
}

#[tokio::test]
async fn test_keyword_free_text_scores_zero() {
    let service = mock_service();

    let messages = vec![Message::user("xylophone quartz jigsaw")];
    let result = service.compute_score("conv-zero", &messages).await.unwrap();

    assert_eq!(result.total_score, 0.0);
    for cs in &result.category_scores {
        assert_eq!(cs.score, 0.0);
        assert!(cs.matched_keywords.is_empty());
    }
}

#[tokio::test]
async fn test_only_user_messages_are_scored() {
    let service = mock_service();

    let messages = vec![
        Message::system("Discuss fruit, vegetables, vitamins, water, hydration, protein."),
        Message::assistant("Remember: sugar, salt, trans fat, breakfast, lunch, dinner!"),
        Message::user("xylophone quartz jigsaw"),
    ];
    let result = service.compute_score("conv-roles", &messages).await.unwrap();

    assert_eq!(result.total_score, 0.0);
    for cs in &result.category_scores {
        assert_eq!(cs.score, 0.0);
        assert!(cs.matched_keywords.is_empty());
    }
}

#[tokio::test]
async fn test_empty_history_scores_zero_with_five_entries() {
    let service = mock_service();

    let result = service.compute_score("conv-empty", &[]).await.unwrap();

    assert_eq!(result.total_score, 0.0);
    assert_eq!(result.category_scores.len(), 5);
    for cs in &result.category_scores {
        assert_eq!(cs.score, 0.0);
        assert!(cs.matched_keywords.is_empty());
    }
}

#[tokio::test]
async fn test_compute_score_is_idempotent() {
    let service = mock_service();
    service.warm_up_keyword_embeddings().await;

    let messages = vec![
        Message::user("I eat fruits and drink water."),
        Message::assistant("Good!"),
        Message::user("Also some protein at breakfast."),
    ];

    let first = service.compute_score("conv-idem", &messages).await.unwrap();
    let second = service.compute_score("conv-idem", &messages).await.unwrap();

    assert_eq!(first.total_score, second.total_score);
    for (a, b) in first.category_scores.iter().zip(&second.category_scores) {
        let a_set: HashSet<&String> = a.matched_keywords.iter().collect();
        let b_set: HashSet<&String> = b.matched_keywords.iter().collect();
        assert_eq!(a_set, b_set);
    }
}

#[tokio::test]
async fn test_category_order_matches_catalog() {
    let service = mock_service();
    let result = service.compute_score("conv-order", &[]).await.unwrap();

    let names: Vec<&str> = result
        .category_scores
        .iter()
        .map(|cs| cs.category.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Fruits & Vegetables",
            "Hydration",
            "Balanced Meals",
            "Processed Foods",
            "Meal Timing",
        ]
    );
}

#[tokio::test]
async fn test_warm_up_restores_from_cache_without_provider_calls() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());

    let first_mock = Arc::new(MockEmbedder::new());
    let first = service_with(first_mock.clone(), store.clone());
    first.warm_up_keyword_embeddings().await;
    assert!(first_mock.embed_calls() > 0);
    assert!(first.keyword_embedding_count().await > 100);

    // Same store, fresh provider: everything restores from the cache.
    let second_mock = Arc::new(MockEmbedder::new());
    let second = service_with(second_mock.clone(), store);
    second.warm_up_keyword_embeddings().await;
    assert_eq!(second_mock.embed_calls(), 0);
    assert_eq!(
        second.keyword_embedding_count().await,
        first.keyword_embedding_count().await
    );
}

#[tokio::test]
async fn test_text_embedding_is_computed_once_per_scoring_call() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let warm_mock = Arc::new(MockEmbedder::new());
    let warm = service_with(warm_mock, store.clone());
    warm.warm_up_keyword_embeddings().await;

    let scoring_mock = Arc::new(MockEmbedder::new());
    let service = service_with(scoring_mock.clone(), store);
    service.warm_up_keyword_embeddings().await;
    assert_eq!(scoring_mock.embed_calls(), 0);

    // Keyword-free text triggers the semantic phase in all five categories,
    // but the text embedding is cached after the first.
    let messages = vec![Message::user("xylophone quartz jigsaw")];
    service.compute_score("conv-cache", &messages).await.unwrap();
    assert_eq!(scoring_mock.embed_calls(), 1);
}

#[tokio::test]
async fn test_provider_failure_degrades_to_literal_only() {
    let service = service_with(Arc::new(MockEmbedder::failing()), Arc::new(MemoryStore::new()));
    service.warm_up_keyword_embeddings().await;
    assert_eq!(service.keyword_embedding_count().await, 0);

    let messages = vec![Message::user("I drink water with every meal plan.")];
    let result = service.compute_score("conv-degraded", &messages).await.unwrap();

    // Literal matches still score; nothing is fatal.
    let hydration = &result.category_scores[1];
    assert!(hydration.matched_keywords.contains(&"water".to_string()));
    assert!(hydration.score > 0.0);
}

#[tokio::test]
async fn test_persisted_total_is_readable() {
    let service = mock_service();

    let messages = vec![Message::user(
        "I eat fruits and vegetables every day. I drink 8 glasses of water.",
    )];
    let result = service.compute_score("conv-persist", &messages).await.unwrap();

    assert_eq!(service.get_score("conv-persist").await, result.total_score);
    assert_eq!(service.get_score("conv-unknown").await, 0.0);
}

struct SaveFailingStore {
    inner: MemoryStore,
}

#[async_trait]
impl KvStore for SaveFailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        if key.starts_with("score:") {
            return Err(StoreError::Backend("write refused".to_string()));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StoreError> {
        self.inner.delete(keys).await
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.rpush(key, value).await
    }

    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, StoreError> {
        self.inner.lrange(key, start, stop).await
    }
}

#[tokio::test]
async fn test_persistence_failure_surfaces_as_error() {
    let store = Arc::new(SaveFailingStore {
        inner: MemoryStore::new(),
    });
    let service = service_with(Arc::new(MockEmbedder::new()), store);

    let messages = vec![Message::user("I drink water.")];
    let err = service.compute_score("conv-fail", &messages).await.unwrap_err();
    assert!(matches!(err, ScoreError::Persistence(_)));
}
