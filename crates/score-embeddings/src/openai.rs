//! OpenAI-compatible embeddings provider.

use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use score_types::ProviderSettings;

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingProvider};

/// Configuration for the OpenAI-compatible embeddings provider.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedderConfig {
    /// API base URL (e.g., "https://api.openai.com/v1")
    pub base_url: String,

    /// Embedding model (e.g., "text-embedding-3-small")
    pub model: String,

    /// API key
    pub api_key: SecretString,

    /// Request timeout
    pub timeout: Duration,

    /// Maximum retries on failure
    pub max_retries: u32,
}

impl OpenAiEmbedderConfig {
    /// Create config for the OpenAI API.
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.into(),
            api_key: SecretString::from(api_key.into()),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }

    /// Build config from loaded settings.
    ///
    /// A missing API key is tolerated (some compatible endpoints accept
    /// anonymous requests); calls will then fail per-request and scoring
    /// degrades to literal matching.
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        let api_key = settings.api_key.clone().unwrap_or_else(|| {
            warn!("No embedding API key configured; provider calls may fail");
            String::new()
        });

        Self {
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            api_key: SecretString::from(api_key),
            timeout: settings.timeout(),
            max_retries: settings.max_retries,
        }
    }
}

/// OpenAI-compatible embeddings provider implementation.
pub struct OpenAiEmbedder {
    client: Client,
    config: OpenAiEmbedderConfig,
}

impl OpenAiEmbedder {
    /// Create a new embedder.
    pub fn new(config: OpenAiEmbedderConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Call the embeddings endpoint with retry logic.
    async fn call_api(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(120)),
            ..Default::default()
        };

        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, inputs = texts.len(), "Calling embeddings API");

            match self.make_request(texts).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempts >= self.config.max_retries {
                        error!(error = %e, "Max retries exceeded");
                        return Err(e);
                    }

                    match backoff.next_backoff() {
                        Some(duration) => {
                            warn!(
                                error = %e,
                                retry_in_ms = duration.as_millis(),
                                "Embeddings call failed, retrying"
                            );
                            tokio::time::sleep(duration).await;
                        }
                        None => {
                            error!(error = %e, "Backoff exhausted");
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    /// Make a single embeddings request.
    async fn make_request(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        #[derive(Serialize)]
        struct EmbeddingsRequest<'a> {
            model: &'a str,
            input: &'a [String],
        }

        #[derive(Deserialize)]
        struct EmbeddingsResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            index: usize,
            embedding: Vec<f32>,
        }

        let request = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };

        let url = format!("{}/embeddings", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::Timeout
                } else {
                    EmbeddingError::Api(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbeddingError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api(format!("{}: {}", status, body)));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Parse(e.to_string()))?;

        if parsed.data.len() != texts.len() {
            return Err(EmbeddingError::Parse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        // The API is not required to return entries in input order.
        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| Embedding::new(d.embedding)).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let input = [text.to_string()];
        let mut embeddings = self.call_api(&input).await?;
        embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::Parse("empty embeddings response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        self.call_api(texts).await
    }
}
