//! Hash-based Embeddings
//!
//! A deterministic bag-of-words embedder that needs no model download.
//! Each lowercase word is hashed into a few signed buckets, and the bucket
//! vector is normalized to unit length. Texts sharing words therefore land
//! close together under cosine similarity, which is enough for local use
//! and for tests.
//!
//! # Examples
//!
//! ```
//! use rationale_embed::HashEmbedder;
//!
//! let embedder = HashEmbedder::new(256);
//! let a = embedder.embed_sync("use postgres for storage").unwrap();
//! let b = embedder.embed_sync("Use Postgres for storage!").unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.len(), 256);
//! ```

use crate::EmbedError;
use async_trait::async_trait;
use rationale_domain::vector::normalize;
use rationale_domain::EmbeddingProvider;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Default embedding dimension
pub const DEFAULT_DIMENSION: usize = 256;

/// Buckets each word is spread over
const HASHES_PER_TOKEN: u64 = 2;

/// Deterministic token-hash embedder
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of `dimension` components
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, token: &str, seed: u64) -> (usize, f32) {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        seed.hash(&mut hasher);
        let h = hasher.finish();

        let index = (h % self.dimension as u64) as usize;
        let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }

    /// Embed synchronously
    pub fn embed_sync(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if text.trim().is_empty() {
            return Err(EmbedError::InvalidInput("text is empty".to_string()));
        }

        let mut vector = vec![0.0f32; self.dimension];
        let mut tokens = 0usize;

        for token in tokenize(text) {
            tokens += 1;
            for seed in 0..HASHES_PER_TOKEN {
                let (index, sign) = self.bucket(&token, seed);
                vector[index] += sign;
            }
        }

        if tokens == 0 {
            return Err(EmbedError::InvalidInput(format!(
                "no words to embed in {:?}",
                text
            )));
        }

        normalize(&mut vector);
        Ok(vector)
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    type Error = EmbedError;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        self.embed_sync(text)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rationale_domain::vector::{cosine_similarity, magnitude};

    #[test]
    fn test_deterministic() {
        let embedder = HashEmbedder::new(128);
        let a = embedder.embed_sync("Adopt event sourcing").unwrap();
        let b = embedder.embed_sync("Adopt event sourcing").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalized() {
        let embedder = HashEmbedder::default();
        let v = embedder.embed_sync("cache invalidation strategy").unwrap();
        assert_eq!(v.len(), DEFAULT_DIMENSION);
        assert!((magnitude(&v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed_sync("Use Redis, not Memcached!").unwrap();
        let b = embedder.embed_sync("use redis not memcached").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shared_words_score_higher() {
        let embedder = HashEmbedder::new(512);
        let base = embedder.embed_sync("database postgres migration plan").unwrap();
        let near = embedder.embed_sync("postgres migration rollout").unwrap();
        let far = embedder.embed_sync("frontend button colour").unwrap();

        assert!(cosine_similarity(&base, &near) > cosine_similarity(&base, &far));
    }

    #[test]
    fn test_empty_text_rejected() {
        let embedder = HashEmbedder::default();
        assert!(matches!(
            embedder.embed_sync("   "),
            Err(EmbedError::InvalidInput(_))
        ));
        assert!(matches!(
            embedder.embed_sync("?!..."),
            Err(EmbedError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_provider_trait() {
        let embedder = HashEmbedder::new(32);
        assert_eq!(EmbeddingProvider::dimension(&embedder), 32);
        let v = embedder.embed("topic decision").await.unwrap();
        assert_eq!(v.len(), 32);
    }
}
