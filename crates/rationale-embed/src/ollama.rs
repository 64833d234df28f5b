//! Ollama Embedding Provider
//!
//! Calls a local Ollama instance's `/api/embeddings` endpoint.
//!
//! # Features
//!
//! - Async HTTP communication with Ollama API
//! - Configurable endpoint, model and expected dimension
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use rationale_embed::OllamaEmbedder;
//!
//! let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text", 768)
//!     .expect("http client");
//! ```

use crate::EmbedError;
use async_trait::async_trait;
use rationale_domain::EmbeddingProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default embedding model
pub const DEFAULT_MODEL: &str = "nomic-embed-text";

/// Dimension of [`DEFAULT_MODEL`]
pub const DEFAULT_DIMENSION: usize = 768;

/// Default timeout for embedding requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API embedding provider
pub struct OllamaEmbedder {
    endpoint: String,
    model: String,
    dimension: usize,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the Ollama embeddings API
#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response from the Ollama embeddings API
#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Embedding model (e.g., "nomic-embed-text")
    /// - `dimension`: Vector length the model produces
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| EmbedError::Communication(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimension,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create an embedder for `http://localhost:11434` and the default model
    pub fn local() -> Result<Self, EmbedError> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_DIMENSION)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Model name sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fetch an embedding from Ollama
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - The returned vector has the wrong dimension
    pub async fn fetch(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if text.trim().is_empty() {
            return Err(EmbedError::InvalidInput("text is empty".to_string()));
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        let body = EmbeddingsRequest {
            model: &self.model,
            prompt: text,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<EmbeddingsResponse>().await.map_err(|e| {
                            EmbedError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return self.check_dimension(parsed.embedding);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(EmbedError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(EmbedError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(EmbedError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(attempts, ?delay, model = %self.model, "embedding request failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| EmbedError::Communication("Max retries exceeded".to_string())))
    }

    fn check_dimension(&self, embedding: Vec<f32>) -> Result<Vec<f32>, EmbedError> {
        if embedding.len() != self.dimension {
            return Err(EmbedError::InvalidResponse(format!(
                "expected {} dimensions from {}, got {}",
                self.dimension,
                self.model,
                embedding.len()
            )));
        }
        debug!(model = %self.model, dimension = self.dimension, "embedding fetched");
        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    type Error = EmbedError;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        self.fetch(text).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
