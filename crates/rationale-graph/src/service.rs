//! Decision graph service
//!
//! The public entry point tying the store, embedding provider and vector
//! index together. Generic over the three collaborator traits so tests can
//! swap any of them.

use crate::assembler::{GraphAssembler, GraphPayload};
use crate::config::EngineConfig;
use crate::error::{GraphError, Result};
use crate::indexing::{index_decisions, IndexingReport};
use crate::metrics::ClusterReport;
use crate::outcome::{require_node_id, OutcomeUpdate};
use crate::session::GraphSession;
use crate::similarity::SimilarityGraphBuilder;
use rationale_domain::{
    Decision, DecisionId, DecisionStore, Edge, EmbeddingProvider, NewDecision, Outcome,
    Relationship, VectorIndex,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Parameters for [`DecisionGraphService::build_graph`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphRequest {
    /// Restrict nodes to this topic
    pub topic: Option<String>,

    /// Compute similarity edges
    pub include_cluster: bool,
}

impl GraphRequest {
    /// Request for every decision
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a topic (builder style)
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Include similarity edges (builder style)
    pub fn clustered(mut self) -> Self {
        self.include_cluster = true;
        self
    }
}

/// A payload plus the clustering report that produced its similarity edges
#[derive(Debug, Clone)]
pub struct GraphBuild {
    /// Assembled graph
    pub payload: GraphPayload,

    /// Present when clustering was requested
    pub report: Option<ClusterReport>,
}

/// One neighbor in a [`SimilarResponse`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarNode {
    /// Neighbor id
    pub id: DecisionId,

    /// Neighbor topic
    pub topic: String,

    /// Neighbor decision text
    pub decision: String,

    /// Cosine similarity to the requested node
    pub similarity: f32,

    /// Neighbor outcome, if any
    pub outcome: Option<Outcome>,
}

/// Nearest neighbors of one decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarResponse {
    /// Requested decision
    pub id: DecisionId,

    /// Neighbors, most similar first
    pub similar: Vec<SimilarNode>,

    /// Number of neighbors
    pub count: usize,
}

/// Builds, clusters and mutates the decision graph
///
/// # Examples
///
/// ```no_run
/// use rationale_graph::{DecisionGraphService, EngineConfig};
/// use rationale_store::{HnswIndex, SqliteStore};
/// use rationale_embed::HashEmbedder;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let embedder = HashEmbedder::default();
/// let index = HnswIndex::new(256);
/// let store = SqliteStore::new("rationale.db")?;
/// let service = DecisionGraphService::new(store, embedder, index, EngineConfig::default())?;
///
/// service.rebuild_index().await?;
/// let graph = service.get_graph(Some("infra"), true).await?;
/// println!("{} nodes, {} similar", graph.meta.total_nodes, graph.meta.similarity_edges);
/// # Ok(())
/// # }
/// ```
pub struct DecisionGraphService<S, E, V> {
    store: S,
    embedder: E,
    index: V,
    config: EngineConfig,
}

impl<S, E, V> DecisionGraphService<S, E, V>
where
    S: DecisionStore,
    E: EmbeddingProvider,
    V: VectorIndex,
{
    /// Create a service after validating `config`
    pub fn new(store: S, embedder: E, index: V, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            embedder,
            index,
            config,
        })
    }

    /// Create a service with the default configuration
    pub fn with_defaults(store: S, embedder: E, index: V) -> Self {
        Self {
            store,
            embedder,
            index,
            config: EngineConfig::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The decision store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The embedding provider
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// The vector index
    pub fn index(&self) -> &V {
        &self.index
    }

    fn builder(&self) -> SimilarityGraphBuilder<'_, E, V> {
        SimilarityGraphBuilder::new(&self.embedder, &self.index, &self.config.cluster)
    }

    async fn snapshot(&self) -> Result<Vec<Decision>> {
        let mut decisions = self.store.list_decisions().await.map_err(GraphError::store)?;
        decisions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(decisions)
    }

    /// Assemble the graph, optionally with similarity edges
    pub async fn get_graph(
        &self,
        topic: Option<&str>,
        include_cluster: bool,
    ) -> Result<GraphPayload> {
        let request = GraphRequest {
            topic: topic.map(str::to_string),
            include_cluster,
        };
        let build = self
            .build_graph(&request, &CancellationToken::new())
            .await?;
        Ok(build.payload)
    }

    /// Assemble the graph and keep the clustering report
    ///
    /// Clustering runs over the unfiltered decision set. When `cancel` fires
    /// mid-run the payload carries the similarity edges found so far.
    pub async fn build_graph(
        &self,
        request: &GraphRequest,
        cancel: &CancellationToken,
    ) -> Result<GraphBuild> {
        let decisions = self.snapshot().await?;
        let edges = self.store.list_edges().await.map_err(GraphError::store)?;

        let report = if request.include_cluster {
            Some(self.builder().build_with_cancel(&decisions, cancel).await)
        } else {
            None
        };

        let similarity = report
            .as_ref()
            .map(|r| r.edges.clone())
            .unwrap_or_default();

        let payload = GraphAssembler::new(self.config.edge_filter).assemble(
            decisions,
            edges,
            request.topic.as_deref(),
            similarity,
        );

        debug!(
            nodes = payload.meta.total_nodes,
            edges = payload.meta.total_edges,
            similar = payload.meta.similarity_edges,
            "graph assembled"
        );

        Ok(GraphBuild { payload, report })
    }

    /// Run similarity clustering over the current store contents
    pub async fn cluster(&self, cancel: &CancellationToken) -> Result<ClusterReport> {
        let decisions = self.snapshot().await?;
        Ok(self.builder().build_with_cancel(&decisions, cancel).await)
    }

    /// Build a graph and wrap it in a navigation session
    pub async fn open_session(&self, request: &GraphRequest) -> Result<GraphSession> {
        let build = self.build_graph(request, &CancellationToken::new()).await?;
        Ok(GraphSession::new(build.payload).with_default_depth(self.config.default_depth))
    }

    /// Nearest neighbors of one decision, enriched with their details
    ///
    /// # Errors
    /// `Validation` (`missing_node_id`) for a blank id, `NotFound` for an
    /// unknown one, `Dependency` when embedding or the index fails.
    pub async fn get_similar_to(&self, node_id: &str) -> Result<SimilarResponse> {
        let id = require_node_id(node_id)?;
        let decision = self
            .store
            .get_decision(&id)
            .await
            .map_err(GraphError::store)?
            .ok_or_else(|| GraphError::NotFound(id.clone()))?;

        let hits = self
            .builder()
            .similar_to(&decision, self.config.similar_limit, self.config.similar_floor)
            .await?;

        let mut similar = Vec::with_capacity(hits.len());
        for hit in hits {
            match self.store.get_decision(&hit.id).await.map_err(GraphError::store)? {
                Some(neighbor) => similar.push(SimilarNode {
                    id: neighbor.id,
                    topic: neighbor.topic,
                    decision: neighbor.decision,
                    similarity: hit.similarity,
                    outcome: neighbor.outcome,
                }),
                None => debug!(id = %hit.id, "skipping neighbor missing from store"),
            }
        }

        Ok(SimilarResponse {
            id,
            count: similar.len(),
            similar,
        })
    }

    /// Normalize and store an outcome change
    pub async fn set_outcome(
        &self,
        node_id: &str,
        outcome: &str,
        reason: Option<&str>,
    ) -> Result<OutcomeUpdate> {
        let update = OutcomeUpdate::parse(node_id, outcome, reason)?;
        update.persist(&self.store).await?;
        Ok(update)
    }

    /// Store an outcome change, then apply it to `session`
    ///
    /// The session is left untouched when the store rejects the change.
    pub async fn set_outcome_in(
        &self,
        session: &mut GraphSession,
        node_id: &str,
        outcome: &str,
        reason: Option<&str>,
    ) -> Result<OutcomeUpdate> {
        let update = self.set_outcome(node_id, outcome, reason).await?;
        session.apply_outcome(&update);
        Ok(update)
    }

    /// Record a new decision and add it to the vector index
    ///
    /// The store is authoritative: an indexing failure is logged and the
    /// stored decision is still returned.
    pub async fn record_decision(&self, new: NewDecision) -> Result<Decision> {
        new.validate()
            .map_err(|msg| GraphError::validation("invalid_decision", msg))?;

        let decision = self
            .store
            .record_decision(new)
            .await
            .map_err(GraphError::store)?;
        info!(id = %decision.id, topic = %decision.topic, "decision recorded");

        let report = index_decisions(
            &self.embedder,
            &self.index,
            std::slice::from_ref(&decision),
            1,
        )
        .await;
        if report.failed > 0 {
            warn!(id = %decision.id, "decision stored but not indexed");
        }

        Ok(decision)
    }

    /// Add an explicit edge between two existing decisions
    ///
    /// # Errors
    /// `Validation` for blank ids or the reserved `similar` relationship,
    /// `NotFound` when either endpoint is missing.
    pub async fn link(&self, edge: Edge) -> Result<()> {
        let from = require_node_id(edge.from.as_str())?;
        let to = require_node_id(edge.to.as_str())?;
        if edge.relationship == Relationship::Similar {
            return Err(GraphError::validation(
                "invalid_relationship",
                "similar edges are derived, not recorded",
            ));
        }

        for id in [&from, &to] {
            if self
                .store
                .get_decision(id)
                .await
                .map_err(GraphError::store)?
                .is_none()
            {
                return Err(GraphError::NotFound(id.clone()));
            }
        }

        let edge = Edge {
            from,
            to,
            ..edge
        };
        self.store
            .add_edge(edge.clone())
            .await
            .map_err(GraphError::store)?;
        info!(from = %edge.from, to = %edge.to, relationship = %edge.relationship, "edge added");
        Ok(())
    }

    /// Replace the vector index contents with embeddings of every stored
    /// decision
    pub async fn rebuild_index(&self) -> Result<IndexingReport> {
        let decisions = self.snapshot().await?;
        self.index
            .clear()
            .await
            .map_err(|e| GraphError::dependency("vector index reset failed", e))?;
        debug!(decisions = decisions.len(), "vector index cleared for rebuild");
        Ok(index_decisions(
            &self.embedder,
            &self.index,
            &decisions,
            self.config.cluster.max_concurrency,
        )
        .await)
    }
}
