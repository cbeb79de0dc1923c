//! Command handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use ulid::Ulid;

use score_catalog::Catalog;
use score_embeddings::{EmbeddingProvider, MockEmbedder, OpenAiEmbedder, OpenAiEmbedderConfig};
use score_engine::ScoringService;
use score_store::{EmbeddingCache, KvStore, MemoryStore, RedisStore, ScoreRepository};
use score_types::{Message, MessageRole, Settings};

/// Transcript entry as read from disk; the timestamp is optional.
#[derive(Debug, Deserialize)]
struct TranscriptMessage {
    role: MessageRole,
    content: String,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

fn read_transcript(path: &str) -> Result<Vec<Message>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript '{path}'"))?;
    let entries: Vec<TranscriptMessage> =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse transcript '{path}'"))?;

    Ok(entries
        .into_iter()
        .map(|e| Message {
            role: e.role,
            content: e.content,
            timestamp: e.timestamp.unwrap_or_else(Utc::now),
        })
        .collect())
}

async fn build_service(settings: &Settings, live: bool) -> Result<ScoringService> {
    let store: Arc<dyn KvStore> = if live {
        match RedisStore::connect(&settings.store.redis_url).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!(error = %e, "Redis unavailable, falling back to in-process store");
                Arc::new(MemoryStore::new())
            }
        }
    } else {
        Arc::new(MemoryStore::new())
    };

    let provider: Arc<dyn EmbeddingProvider> = if live {
        let config = OpenAiEmbedderConfig::from_settings(&settings.provider);
        Arc::new(OpenAiEmbedder::new(config)?)
    } else {
        Arc::new(MockEmbedder::new())
    };

    let cache = EmbeddingCache::with_ttl(
        store.clone(),
        std::time::Duration::from_secs(settings.store.embedding_ttl_secs),
    );
    let scores = ScoreRepository::with_ttl(
        store,
        std::time::Duration::from_secs(settings.store.score_ttl_secs),
    );

    Ok(ScoringService::with_similarity_threshold(
        Arc::new(Catalog::healthy_eating()),
        provider,
        cache,
        scores,
        settings.similarity_threshold,
    ))
}

/// Score a transcript file and print the result.
pub async fn handle_score(
    settings: &Settings,
    file: &str,
    id: Option<String>,
    live: bool,
    json: bool,
) -> Result<()> {
    let messages = read_transcript(file)?;
    let conversation_id = id.unwrap_or_else(|| Ulid::new().to_string());

    let service = build_service(settings, live).await?;
    service.warm_up_keyword_embeddings().await;

    let result = service.compute_score(&conversation_id, &messages).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Conversation: {}", result.conversation_id);
    println!(
        "Total: {:.1}/{:.0}",
        result.total_score, result.max_possible_score
    );
    println!();
    for cs in &result.category_scores {
        println!(
            "  {:<20} {:>5.1}/{:.0}  [{}]",
            cs.category,
            cs.score,
            cs.max_score,
            cs.matched_keywords.join(", ")
        );
    }
    println!();
    println!("{}", result.evaluation_summary);

    Ok(())
}

/// Print the persisted total for a conversation.
pub async fn handle_get_score(settings: &Settings, id: &str) -> Result<()> {
    let service = build_service(settings, true).await?;
    let total = service.get_score(id).await;
    println!("{total}");
    Ok(())
}

/// Print the category catalog.
pub fn handle_catalog() -> Result<()> {
    let catalog = Catalog::healthy_eating();
    for category in catalog.categories() {
        println!(
            "{} (max {:.0}, {} keywords)",
            category.name,
            category.max_score,
            category.keywords.len()
        );
        println!("  {}", category.description);
    }
    println!();
    println!("Total achievable: {:.0}", catalog.total_max_score());
    Ok(())
}
