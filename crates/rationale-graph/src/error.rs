//! Error types for graph engine operations

use rationale_domain::DecisionId;
use std::fmt::Display;
use thiserror::Error;

/// Result alias for graph engine operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while building or querying the decision graph
///
/// Cancellation is not an error: a cancelled clustering run returns a
/// partial [`ClusterReport`](crate::ClusterReport).
#[derive(Error, Debug)]
pub enum GraphError {
    /// A required argument was missing or malformed
    #[error("{message}")]
    Validation {
        /// Stable machine-readable code (e.g. `missing_node_id`)
        code: &'static str,
        /// Human-readable explanation
        message: String,
    },

    /// Decision id does not exist
    #[error("Decision not found: {0}")]
    NotFound(DecisionId),

    /// Embedding provider or vector index failure
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// Decision store failure
    #[error("Storage error: {0}")]
    Store(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GraphError {
    /// Build a validation error
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        GraphError::Validation {
            code,
            message: message.into(),
        }
    }

    /// Empty or blank node id
    pub fn missing_node_id() -> Self {
        Self::validation("missing_node_id", "node id is required")
    }

    pub(crate) fn store(err: impl Display) -> Self {
        GraphError::Store(err.to_string())
    }

    pub(crate) fn dependency(context: &str, err: impl Display) -> Self {
        GraphError::Dependency(format!("{}: {}", context, err))
    }

    /// Stable snake_case code for this error
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::Validation { code, .. } => code,
            GraphError::NotFound(_) => "not_found",
            GraphError::Dependency(_) => "dependency_failure",
            GraphError::Store(_) => "store_failure",
            GraphError::Config(_) => "invalid_config",
        }
    }
}
