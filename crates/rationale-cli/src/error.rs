//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Graph engine error
    #[error("{0}")]
    Graph(#[from] rationale_graph::GraphError),

    /// Storage error while opening the database
    #[error("Storage error: {0}")]
    Store(#[from] rationale_store::StoreError),

    /// Embedding backend error
    #[error("Embedding error: {0}")]
    Embed(#[from] rationale_embed::EmbedError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// REPL command that needs a loaded graph
    #[error("No graph loaded. Use 'reload' first.")]
    NoGraph,
}

impl CliError {
    /// Stable code for JSON error output
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Graph(e) => e.code(),
            CliError::Config(_) | CliError::Toml(_) => "invalid_config",
            CliError::Store(_) => "store_failure",
            CliError::Embed(_) => "dependency_failure",
            CliError::Io(_) => "io_failure",
            CliError::Serialization(_) => "serialization_failure",
            CliError::InvalidInput(_) => "invalid_input",
            CliError::NoGraph => "no_graph",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rationale_graph::GraphError;

    #[test]
    fn test_graph_codes_pass_through() {
        let err: CliError = GraphError::missing_node_id().into();
        assert_eq!(err.code(), "missing_node_id");
        assert_eq!(
            CliError::InvalidInput("x".to_string()).code(),
            "invalid_input"
        );
    }
}
