//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use rationale_embed::{hash, ollama};
use rationale_graph::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Stored at `~/.rationale/config.toml`:
///
/// ```toml
/// database = "/home/me/.rationale/rationale.db"
///
/// [embedding]
/// backend = "ollama"
/// endpoint = "http://localhost:11434"
/// model = "nomic-embed-text"
/// dimension = 768
///
/// [engine]
/// default_depth = 2
///
/// [engine.cluster]
/// similarity_threshold = 0.75
///
/// [settings]
/// color = true
/// format = "table"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file; defaults to `rationale.db` next to the config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Embedding backend
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Graph engine parameters
    #[serde(default)]
    pub engine: EngineConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Which embedding provider to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum EmbeddingConfig {
    /// Offline token-hash embeddings
    Hash {
        /// Vector dimension
        #[serde(default = "default_hash_dimension")]
        dimension: usize,
    },

    /// Ollama embeddings API
    Ollama {
        /// Server endpoint
        #[serde(default = "default_ollama_endpoint")]
        endpoint: String,

        /// Embedding model
        #[serde(default = "default_ollama_model")]
        model: String,

        /// Dimension the model produces
        #[serde(default = "default_ollama_dimension")]
        dimension: usize,

        /// Attempts per request
        #[serde(default = "default_max_retries")]
        max_retries: u32,
    },
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the config, database and REPL history.
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".rationale"))
    }

    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path or fall back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path` or fall back to defaults when it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        if self.embedding.dimension() == 0 {
            return Err(CliError::Config(
                "embedding dimension must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Database file to open.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::home_dir()?.join("rationale.db")),
        }
    }
}

impl EmbeddingConfig {
    /// Dimension of the vectors this backend produces.
    pub fn dimension(&self) -> usize {
        match self {
            EmbeddingConfig::Hash { dimension } | EmbeddingConfig::Ollama { dimension, .. } => {
                *dimension
            }
        }
    }

    /// Backend name for logs.
    pub fn backend_name(&self) -> &'static str {
        match self {
            EmbeddingConfig::Hash { .. } => "hash",
            EmbeddingConfig::Ollama { .. } => "ollama",
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig::Hash {
            dimension: default_hash_dimension(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: default_history_size(),
        }
    }
}

fn default_hash_dimension() -> usize {
    hash::DEFAULT_DIMENSION
}

fn default_ollama_endpoint() -> String {
    ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_ollama_model() -> String {
    ollama::DEFAULT_MODEL.to_string()
}

fn default_ollama_dimension() -> usize {
    ollama::DEFAULT_DIMENSION
}

fn default_max_retries() -> u32 {
    ollama::DEFAULT_MAX_RETRIES
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use rationale_graph::EdgeFilterPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database.is_none());
        assert_eq!(config.embedding.backend_name(), "hash");
        assert_eq!(config.embedding.dimension(), hash::DEFAULT_DIMENSION);
        assert!(config.settings.color);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_ollama_and_engine_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
database = "/tmp/decisions.db"

[embedding]
backend = "ollama"
model = "mxbai-embed-large"
dimension = 1024

[engine]
default_depth = 2
edge_filter = "both_endpoints"

[engine.cluster]
similarity_threshold = 0.8

[settings]
format = "json"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/decisions.db"));
        match &config.embedding {
            EmbeddingConfig::Ollama {
                endpoint,
                model,
                dimension,
                max_retries,
            } => {
                assert_eq!(endpoint, ollama::DEFAULT_ENDPOINT);
                assert_eq!(model, "mxbai-embed-large");
                assert_eq!(*dimension, 1024);
                assert_eq!(*max_retries, ollama::DEFAULT_MAX_RETRIES);
            }
            other => panic!("Expected ollama backend, got {:?}", other),
        }
        assert_eq!(config.engine.default_depth, 2);
        assert_eq!(config.engine.edge_filter, EdgeFilterPolicy::BothEndpoints);
        assert_eq!(config.engine.cluster.similarity_threshold, 0.8);
        assert_eq!(config.engine.cluster.sample_limit, 50);
        assert_eq!(config.settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_engine_section_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[engine.cluster]\nsimilarity_threshold = 1.5\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(err.code(), "invalid_config");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.database = Some(dir.path().join("rationale.db"));
        config.settings.color = false;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
