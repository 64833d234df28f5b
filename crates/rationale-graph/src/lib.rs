//! Rationale Graph Engine
//!
//! Builds a navigable graph of decisions from explicit relationships plus
//! semantically derived "similar" edges, and supports bounded-depth
//! traversal and multi-field search over the result.
//!
//! # Overview
//!
//! The engine is responsible for:
//! - **Similarity clustering**: Deduplicated implicit edges between decisions
//!   whose embeddings are close, computed on demand and never persisted
//! - **Graph assembly**: Decisions, explicit edges and similarity edges in one
//!   payload, with topic filtering and summary metadata
//! - **Traversal**: Undirected adjacency over explicit edges and reachable sets
//! - **Search**: Case-insensitive substring matching with a cyclic cursor
//! - **Outcomes**: Normalized outcome updates applied to sessions and the store
//!
//! # Architecture
//!
//! [`DecisionGraphService`] is generic over the three collaborator traits from
//! `rationale-domain` (`DecisionStore`, `EmbeddingProvider`, `VectorIndex`).
//! A [`GraphSession`] holds one assembled payload for one client and answers
//! traversal and search queries synchronously.
//!
//! ## Clustering Parameters
//!
//! | Parameter | Default | Meaning |
//! |-----------|---------|---------|
//! | `candidate_pool_size` | 100 | Most recent decisions considered |
//! | `sample_limit` | 50 | Anchors taken from the front of the pool |
//! | `top_k_per_anchor` | 3 | Neighbors kept per anchor |
//! | `similarity_threshold` | 0.7 | Edges need strictly greater similarity |
//! | `max_concurrency` | 4 | Anchor round trips in flight |
//! | `anchor_timeout_ms` | 10000 | Timeout per embedding or index call |
//!
//! # Usage
//!
//! ## Graph with similarity edges
//!
//! ```no_run
//! use rationale_graph::{DecisionGraphService, GraphRequest, GraphSession};
//! use rationale_store::{FlatIndex, SqliteStore};
//! use rationale_embed::HashEmbedder;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("rationale.db")?;
//! let service = DecisionGraphService::with_defaults(store, HashEmbedder::default(), FlatIndex::new(256));
//! service.rebuild_index().await?;
//!
//! let build = service
//!     .build_graph(&GraphRequest::all().clustered(), &CancellationToken::new())
//!     .await?;
//! if let Some(report) = &build.report {
//!     println!("{}", report.summary());
//! }
//!
//! let mut session = GraphSession::new(build.payload);
//! session.search("postgres");
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use rationale_graph::ClusterConfig;
//!
//! let config = ClusterConfig::default();
//! let config = ClusterConfig::thorough();
//! let config = ClusterConfig::fast();
//! ```
//!
//! # Configuration
//!
//! The engine can be configured via TOML:
//!
//! ```toml
//! default_depth = 3
//! similar_limit = 5
//! similar_floor = 0.0
//! edge_filter = "either_endpoint"
//!
//! [cluster]
//! similarity_threshold = 0.7
//! max_concurrency = 4
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod assembler;
mod config;
mod error;
mod indexing;
mod metrics;
mod outcome;
mod presentation;
mod search;
mod session;
mod service;
mod similarity;
mod traversal;

pub use assembler::{GraphAssembler, GraphMeta, GraphPayload};
pub use config::{
    ClusterConfig, EdgeFilterPolicy, EngineConfig, DEFAULT_MAX_DEPTH, DEFAULT_SIMILAR_LIMIT,
};
pub use error::{GraphError, Result};
pub use indexing::{index_decisions, IndexingReport};
pub use metrics::ClusterReport;
pub use outcome::{require_node_id, OutcomeUpdate};
pub use presentation::{
    fnv1a, topic_color, topic_palette_index, NodeStyle, OutcomeColor, PALETTE,
};
pub use search::SearchIndex;
pub use service::{DecisionGraphService, GraphBuild, GraphRequest, SimilarNode, SimilarResponse};
pub use session::GraphSession;
pub use similarity::SimilarityGraphBuilder;
pub use traversal::{Adjacency, Highlight};
