//! Rationale Embedding Layer
//!
//! Pluggable text embedding providers behind the `EmbeddingProvider` trait
//! from `rationale-domain`.
//!
//! # Providers
//!
//! - `HashEmbedder`: Deterministic token-hash embeddings, no model needed
//! - `OllamaEmbedder`: Local Ollama embeddings API
//! - `MockEmbedder`: Scripted vectors and failures for testing
//!
//! # Examples
//!
//! ```
//! use rationale_embed::MockEmbedder;
//! use rationale_domain::EmbeddingProvider;
//!
//! let mut embedder = MockEmbedder::new(3);
//! embedder.add_vector("postgres", vec![1.0, 0.0, 0.0]);
//! assert_eq!(embedder.dimension(), 3);
//! ```

#![warn(missing_docs)]

pub mod hash;
pub mod ollama;

use async_trait::async_trait;
use rationale_domain::EmbeddingProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use hash::HashEmbedder;
pub use ollama::OllamaEmbedder;

/// Errors that can occur while producing embeddings
#[derive(Error, Debug)]
pub enum EmbedError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Text cannot be embedded
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider answered with something unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),
}

#[derive(Debug, Clone)]
enum Scripted {
    Vector(Vec<f32>),
    Error,
}

/// Mock embedding provider for deterministic testing
///
/// Returns pre-configured vectors per text and an all-ones vector
/// for anything else. Call counts are shared across clones.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
    scripted: Arc<Mutex<HashMap<String, Scripted>>>,
    call_count: Arc<Mutex<usize>>,
}

fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockEmbedder {
    /// Create a mock producing vectors of `dimension` components
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            scripted: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Return `vector` whenever `text` is embedded
    pub fn add_vector(&mut self, text: impl Into<String>, vector: Vec<f32>) {
        guard(&self.scripted).insert(text.into(), Scripted::Vector(vector));
    }

    /// Fail whenever `text` is embedded
    pub fn add_error(&mut self, text: impl Into<String>) {
        guard(&self.scripted).insert(text.into(), Scripted::Error);
    }

    /// Get the number of times embed was called
    pub fn call_count(&self) -> usize {
        *guard(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *guard(&self.call_count) = 0;
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    type Error = EmbedError;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        *guard(&self.call_count) += 1;

        match guard(&self.scripted).get(text) {
            Some(Scripted::Vector(v)) => Ok(v.clone()),
            Some(Scripted::Error) => Err(EmbedError::Communication(format!(
                "mock failure for {:?}",
                text
            ))),
            None => Ok(vec![1.0; self.dimension]),
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_vector() {
        let embedder = MockEmbedder::new(4);
        let v = embedder.embed("anything").await.unwrap();
        assert_eq!(v, vec![1.0; 4]);
    }

    #[tokio::test]
    async fn test_mock_scripted_vectors() {
        let mut embedder = MockEmbedder::new(2);
        embedder.add_vector("a", vec![1.0, 0.0]);
        embedder.add_vector("b", vec![0.0, 1.0]);

        assert_eq!(embedder.embed("a").await.unwrap(), vec![1.0, 0.0]);
        assert_eq!(embedder.embed("b").await.unwrap(), vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_mock_error() {
        let mut embedder = MockEmbedder::new(2);
        embedder.add_error("broken");

        let result = embedder.embed("broken").await;
        assert!(matches!(result, Err(EmbedError::Communication(_))));
    }

    #[tokio::test]
    async fn test_mock_call_count_shared_by_clones() {
        let embedder = MockEmbedder::new(2);
        let clone = embedder.clone();

        embedder.embed("x").await.unwrap();
        clone.embed("y").await.unwrap();
        assert_eq!(embedder.call_count(), 2);

        clone.reset_call_count();
        assert_eq!(embedder.call_count(), 0);
    }
}
