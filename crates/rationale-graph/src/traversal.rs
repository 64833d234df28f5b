//! Traversal Engine
//!
//! Undirected adjacency over explicit edges and bounded-depth reachability.
//! Similarity edges never contribute to adjacency.

use rationale_domain::{DecisionId, Edge, SimilarityEdge};
use std::collections::{HashMap, HashSet, VecDeque};

/// Undirected multimap of explicit edges
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    neighbors: HashMap<DecisionId, Vec<DecisionId>>,
}

impl Adjacency {
    /// Build adjacency from explicit edges, recording both directions
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let mut neighbors: HashMap<DecisionId, Vec<DecisionId>> = HashMap::new();
        for edge in edges {
            neighbors
                .entry(edge.from.clone())
                .or_default()
                .push(edge.to.clone());
            neighbors
                .entry(edge.to.clone())
                .or_default()
                .push(edge.from.clone());
        }
        Self { neighbors }
    }

    /// Neighbors of `id`, with repeats for parallel edges
    pub fn neighbors(&self, id: &DecisionId) -> &[DecisionId] {
        self.neighbors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of edge endpoints at `id`
    pub fn degree(&self, id: &DecisionId) -> usize {
        self.neighbors(id).len()
    }

    /// Breadth-first set of nodes within `max_depth` hops of `root`
    ///
    /// Always contains `root`, even when it has no edges.
    pub fn reachable(&self, root: &DecisionId, max_depth: usize) -> HashSet<DecisionId> {
        let mut visited = HashSet::from([root.clone()]);
        let mut queue = VecDeque::from([(root, 0usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for next in self.neighbors(current) {
                if visited.insert(next.clone()) {
                    queue.push_back((next, depth + 1));
                }
            }
        }

        visited
    }
}

/// Nodes and edges to emphasize around a focused node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    /// Focused node
    pub root: DecisionId,

    /// Depth used to compute `nodes`
    pub depth: usize,

    /// Reachable set
    pub nodes: HashSet<DecisionId>,
}

impl Highlight {
    /// Compute the highlight for `root` within `depth` hops
    pub fn compute(adjacency: &Adjacency, root: &DecisionId, depth: usize) -> Self {
        Self {
            root: root.clone(),
            depth,
            nodes: adjacency.reachable(root, depth),
        }
    }

    /// Whether a node is emphasized
    pub fn contains(&self, id: &DecisionId) -> bool {
        self.nodes.contains(id)
    }

    /// An edge is emphasized only when both endpoints are
    pub fn emphasizes(&self, from: &DecisionId, to: &DecisionId) -> bool {
        self.contains(from) && self.contains(to)
    }

    /// Emphasized explicit edges
    pub fn edges<'a>(&'a self, edges: &'a [Edge]) -> impl Iterator<Item = &'a Edge> + 'a {
        edges.iter().filter(|e| self.emphasizes(&e.from, &e.to))
    }

    /// Emphasized similarity edges
    pub fn similarity_edges<'a>(
        &'a self,
        edges: &'a [SimilarityEdge],
    ) -> impl Iterator<Item = &'a SimilarityEdge> + 'a {
        edges.iter().filter(|e| self.emphasizes(&e.from, &e.to))
    }
}
