//! Wiring the configured adapters into a graph service.

use crate::config::{Config, EmbeddingConfig};
use crate::error::Result;
use async_trait::async_trait;
use rationale_domain::EmbeddingProvider;
use rationale_embed::{EmbedError, HashEmbedder, OllamaEmbedder};
use rationale_graph::DecisionGraphService;
use rationale_store::{HnswIndex, SqliteStore};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// The embedding provider selected in the configuration.
pub enum Embedder {
    /// Offline token-hash embeddings
    Hash(HashEmbedder),
    /// Ollama embeddings API
    Ollama(OllamaEmbedder),
}

impl Embedder {
    /// Build the provider described by `config`.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let embedder = match config {
            EmbeddingConfig::Hash { dimension } => Embedder::Hash(HashEmbedder::new(*dimension)),
            EmbeddingConfig::Ollama {
                endpoint,
                model,
                dimension,
                max_retries,
            } => Embedder::Ollama(
                OllamaEmbedder::new(endpoint.as_str(), model.as_str(), *dimension)?
                    .with_max_retries(*max_retries),
            ),
        };
        Ok(embedder)
    }
}

#[async_trait]
impl EmbeddingProvider for Embedder {
    type Error = EmbedError;

    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, Self::Error> {
        match self {
            Embedder::Hash(embedder) => embedder.embed(text).await,
            Embedder::Ollama(embedder) => embedder.embed(text).await,
        }
    }

    fn dimension(&self) -> usize {
        match self {
            Embedder::Hash(embedder) => embedder.dimension(),
            Embedder::Ollama(embedder) => embedder.dimension(),
        }
    }
}

/// The service type every command runs against.
pub type Service = DecisionGraphService<SqliteStore, Embedder, HnswIndex>;

/// Open the database and build an empty vector index for it.
///
/// `database` overrides the configured path.
pub fn open_service(config: &Config, database: Option<&Path>) -> Result<Service> {
    let path = match database {
        Some(path) => path.to_path_buf(),
        None => config.database_path()?,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let store = SqliteStore::new(&path)?;
    let embedder = Embedder::from_config(&config.embedding)?;
    let index = HnswIndex::new(embedder.dimension());
    debug!(
        database = %path.display(),
        backend = config.embedding.backend_name(),
        "opening decision store"
    );

    Ok(DecisionGraphService::new(
        store,
        embedder,
        index,
        config.engine.clone(),
    )?)
}

/// Embed every stored decision so similarity lookups can run.
pub async fn load_index(service: &Service) -> Result<()> {
    let report = service.rebuild_index().await?;
    info!(
        indexed = report.indexed,
        failed = report.failed,
        "decision embeddings ready"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rationale_domain::NewDecision;
    use tempfile::TempDir;

    #[test]
    fn test_embedder_from_config() {
        let hash = Embedder::from_config(&EmbeddingConfig::Hash { dimension: 64 }).unwrap();
        assert!(matches!(hash, Embedder::Hash(_)));
        assert_eq!(hash.dimension(), 64);

        let ollama = Embedder::from_config(&EmbeddingConfig::Ollama {
            endpoint: "http://localhost:11434/".to_string(),
            model: "nomic-embed-text".to_string(),
            dimension: 768,
            max_retries: 1,
        })
        .unwrap();
        assert!(matches!(ollama, Embedder::Ollama(_)));
        assert_eq!(ollama.dimension(), 768);
    }

    #[tokio::test]
    async fn test_open_service_creates_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("rationale.db");

        let service = open_service(&Config::default(), Some(path.as_path())).unwrap();
        assert!(path.exists());

        service
            .record_decision(NewDecision::new("infra", "Use Postgres", ""))
            .await
            .unwrap();
        assert_eq!(service.index().len(), 1);

        let reopened = open_service(&Config::default(), Some(path.as_path())).unwrap();
        assert!(reopened.index().is_empty());
        load_index(&reopened).await.unwrap();
        assert_eq!(reopened.index().len(), 1);
    }
}
