//! Embedding vector type and provider trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;

/// Vector embedding - a fixed-length float array.
///
/// Vectors are stored as returned by the provider; cosine similarity
/// normalizes explicitly rather than assuming unit length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// The embedding vector
    pub values: Vec<f32>,
}

impl Embedding {
    /// Create a new embedding from a vector.
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Get the embedding dimension
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Compute cosine similarity with another embedding.
    ///
    /// Dot product divided by the product of the two Euclidean norms,
    /// in [-1, 1]. Returns 0.0 on dimension mismatch or a zero vector.
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.values.len() != other.values.len() {
            return 0.0;
        }

        let dot: f32 = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum();
        let norm_a: f32 = self.values.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = other.values.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot / (norm_a * norm_b)
    }
}

/// Trait for embedding providers.
///
/// Implementations must be thread-safe (Send + Sync) for concurrent use,
/// and must report failure per-call so callers can degrade gracefully.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Generate embeddings for multiple texts (batch).
    /// Default implementation calls embed() for each text.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let emb = Embedding::new(vec![0.3, 0.5, 0.2]);
        assert!((emb.cosine_similarity(&emb) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let emb1 = Embedding::new(vec![1.0, 0.0]);
        let emb2 = Embedding::new(vec![0.0, 1.0]);
        assert_eq!(emb1.cosine_similarity(&emb2), 0.0);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let emb1 = Embedding::new(vec![1.0, 0.0]);
        let emb2 = Embedding::new(vec![-1.0, 0.0]);
        assert!((emb1.cosine_similarity(&emb2) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_unnormalized_inputs() {
        // Scaling either vector must not change the similarity.
        let emb1 = Embedding::new(vec![3.0, 4.0]);
        let emb2 = Embedding::new(vec![30.0, 40.0]);
        assert!((emb1.cosine_similarity(&emb2) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        let emb1 = Embedding::new(vec![1.0, 0.0]);
        let emb2 = Embedding::new(vec![1.0, 0.0, 0.0]);
        assert_eq!(emb1.cosine_similarity(&emb2), 0.0);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let emb1 = Embedding::new(vec![0.0, 0.0]);
        let emb2 = Embedding::new(vec![1.0, 0.0]);
        assert_eq!(emb1.cosine_similarity(&emb2), 0.0);
    }
}
