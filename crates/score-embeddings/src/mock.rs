//! Mock embedding provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingProvider};

/// Dimension of vectors produced by the mock.
const MOCK_DIMENSION: usize = 256;

/// Mock embedder that generates deterministic embeddings.
///
/// Useful for testing without making API calls. Unpinned texts map to a
/// pseudo-random vector seeded by a hash of the lower-cased text, so the
/// same text always embeds identically while distinct texts are nearly
/// orthogonal; pin vectors with [`with_vector`] where a test needs exact
/// similarities.
///
/// [`with_vector`]: MockEmbedder::with_vector
pub struct MockEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockEmbedder {
    /// Create a new mock embedder.
    pub fn new() -> Self {
        Self {
            vectors: HashMap::new(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock whose every call fails, for degradation tests.
    pub fn failing() -> Self {
        Self {
            vectors: HashMap::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Pin the vector returned for a given text (case-insensitive).
    pub fn with_vector(mut self, text: impl Into<String>, values: Vec<f32>) -> Self {
        self.vectors.insert(text.into().to_lowercase(), values);
        self
    }

    /// Number of embed calls made so far (batch counts each input).
    pub fn embed_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let key = text.to_lowercase();
        if let Some(values) = self.vectors.get(&key) {
            return values.clone();
        }

        // FNV-1a over the lower-cased bytes seeds a splitmix-style stream.
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in key.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }

        let mut state = hash;
        let mut values = Vec::with_capacity(MOCK_DIMENSION);
        for _ in 0..MOCK_DIMENSION {
            state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^= z >> 31;
            // Map to [-1, 1]
            values.push((z as f64 / u64::MAX as f64 * 2.0 - 1.0) as f32);
        }
        values
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(EmbeddingError::Api("mock provider failure".to_string()));
        }
        if text.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        Ok(Embedding::new(self.vector_for(text)))
    }
}
