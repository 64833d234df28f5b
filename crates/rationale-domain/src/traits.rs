//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the graph engine and its
//! collaborators. Implementations live in other crates (rationale-store,
//! rationale-embed) or in callers' own code.

use crate::{Decision, DecisionId, Edge, NewDecision, Outcome};
use async_trait::async_trait;

/// Trait for the authoritative decision/edge store
///
/// Implemented by the infrastructure layer (rationale-store)
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// List every decision, newest first (by `created_at` descending)
    async fn list_decisions(&self) -> Result<Vec<Decision>, Self::Error>;

    /// List every explicit edge
    async fn list_edges(&self) -> Result<Vec<Edge>, Self::Error>;

    /// Get a decision by ID
    async fn get_decision(&self, id: &DecisionId) -> Result<Option<Decision>, Self::Error>;

    /// Update a decision's outcome
    ///
    /// Returns `false` when no decision with `id` exists.
    async fn set_outcome(
        &self,
        id: &DecisionId,
        outcome: Outcome,
        reason: Option<&str>,
    ) -> Result<bool, Self::Error>;

    /// Record a new decision, assigning its id and creation time
    async fn record_decision(&self, decision: NewDecision) -> Result<Decision, Self::Error>;

    /// Add an explicit edge
    async fn add_edge(&self, edge: Edge) -> Result<(), Self::Error>;
}

/// Trait for text embedding providers
///
/// Implemented by rationale-embed
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Error type for embedding operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate an embedding vector for the given text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error>;

    /// Dimension of vectors produced by this provider
    fn dimension(&self) -> usize;
}

/// One nearest-neighbor hit
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Decision the stored vector belongs to
    pub id: DecisionId,

    /// Cosine similarity to the query vector
    pub similarity: f32,
}

impl Neighbor {
    /// Create a new neighbor hit
    pub fn new(id: impl Into<DecisionId>, similarity: f32) -> Self {
        Self {
            id: id.into(),
            similarity,
        }
    }
}

/// Trait for nearest-neighbor vector indexes
///
/// Implemented by rationale-store
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Error type for index operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return up to `k` neighbors with similarity `>= min_similarity`,
    /// ranked by similarity descending
    ///
    /// Results are not self-filtered: a query built from a stored decision's
    /// own text will usually return that decision first.
    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        min_similarity: f32,
    ) -> Result<Vec<Neighbor>, Self::Error>;

    /// Insert (or replace) the vector stored for `id`
    async fn insert(&self, id: DecisionId, vector: Vec<f32>) -> Result<(), Self::Error>;

    /// Drop every stored vector, releasing any capacity held by replaced ones
    async fn clear(&self) -> Result<(), Self::Error>;
}
