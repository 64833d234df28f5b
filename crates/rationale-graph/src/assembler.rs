//! Graph Assembler
//!
//! Merges decisions, explicit edges and optional similarity edges into one
//! [`GraphPayload`], applying the topic filter and computing summary metadata.

use crate::config::EdgeFilterPolicy;
use rationale_domain::{Decision, DecisionId, Edge, SimilarityEdge};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Summary metadata for a payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphMeta {
    /// Nodes in the payload
    pub total_nodes: usize,

    /// Explicit edges in the payload
    pub total_edges: usize,

    /// Similarity edges in the payload
    pub similarity_edges: usize,

    /// Sorted unique topics present, or only the filter topic when one was applied
    pub topics: Vec<String>,
}

/// A navigable decision graph for one request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphPayload {
    /// Decisions, newest first
    pub nodes: Vec<Decision>,

    /// Explicit edges
    pub edges: Vec<Edge>,

    /// Implicit similarity edges (empty unless clustering was requested)
    pub similarity_edges: Vec<SimilarityEdge>,

    /// Summary metadata
    pub meta: GraphMeta,
}

impl GraphPayload {
    /// Look up a node by id
    pub fn node(&self, id: &DecisionId) -> Option<&Decision> {
        self.nodes.iter().find(|d| &d.id == id)
    }

    /// Mutable lookup of a node by id
    pub fn node_mut(&mut self, id: &DecisionId) -> Option<&mut Decision> {
        self.nodes.iter_mut().find(|d| &d.id == id)
    }
}

/// Builds payloads from store snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphAssembler {
    policy: EdgeFilterPolicy,
}

impl GraphAssembler {
    /// Create an assembler using `policy` for boundary edges
    pub fn new(policy: EdgeFilterPolicy) -> Self {
        Self { policy }
    }

    /// Assemble a payload
    ///
    /// `similarity` holds edges computed over the unfiltered decision set;
    /// only those with both endpoints among the surviving nodes are kept.
    /// A blank topic means no filter.
    pub fn assemble(
        &self,
        mut decisions: Vec<Decision>,
        edges: Vec<Edge>,
        topic: Option<&str>,
        similarity: Vec<SimilarityEdge>,
    ) -> GraphPayload {
        // Stable sort keeps the store's order among equal timestamps
        decisions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let topic = topic.map(str::trim).filter(|t| !t.is_empty());
        let nodes: Vec<Decision> = match topic {
            Some(t) => decisions.into_iter().filter(|d| d.topic == t).collect(),
            None => decisions,
        };

        let kept: HashSet<&DecisionId> = nodes.iter().map(|d| &d.id).collect();

        let edges: Vec<Edge> = match topic {
            Some(_) => edges
                .into_iter()
                .filter(|e| self.policy.keeps(kept.contains(&e.from), kept.contains(&e.to)))
                .collect(),
            None => edges,
        };

        let similarity_edges: Vec<SimilarityEdge> = similarity
            .into_iter()
            .filter(|e| kept.contains(&e.from) && kept.contains(&e.to))
            .collect();

        let topics = match topic {
            Some(t) => vec![t.to_string()],
            None => nodes
                .iter()
                .map(|d| d.topic.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };

        let meta = GraphMeta {
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            similarity_edges: similarity_edges.len(),
            topics,
        };

        GraphPayload {
            nodes,
            edges,
            similarity_edges,
            meta,
        }
    }
}
