//! Outcome of one similarity clustering run

use rationale_domain::SimilarityEdge;
use std::time::Duration;

/// Edges and counters produced by a clustering run
///
/// A report is partial when any anchor failed or the run was cancelled;
/// the edges it holds are still valid.
#[derive(Debug, Clone, Default)]
pub struct ClusterReport {
    /// Deduplicated similarity edges, in anchor order
    pub edges: Vec<SimilarityEdge>,

    /// Anchors selected for this run
    pub anchors_sampled: usize,

    /// Anchors whose results reached the reducer (succeeded or failed)
    pub anchors_processed: usize,

    /// Anchors whose embedding or index call failed or timed out
    pub anchors_failed: usize,

    /// Neighbors dropped as self-matches or at/below the threshold
    pub neighbors_discarded: usize,

    /// Neighbors dropped because their pair was already emitted
    pub duplicates_skipped: usize,

    /// Whether the run stopped on cancellation
    pub cancelled: bool,

    /// Wall time of the run
    pub elapsed: Duration,
}

impl ClusterReport {
    /// Create an empty report for `anchors_sampled` anchors
    pub fn new(anchors_sampled: usize) -> Self {
        Self {
            anchors_sampled,
            ..Self::default()
        }
    }

    /// Number of edges emitted
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when some anchors contributed nothing
    pub fn is_partial(&self) -> bool {
        self.cancelled || self.anchors_failed > 0
    }

    /// Generate a summary report of the run
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Similarity Clustering Summary".to_string(),
            "=============================".to_string(),
            format!(
                "Anchors: {} sampled, {} processed, {} failed",
                self.anchors_sampled, self.anchors_processed, self.anchors_failed
            ),
            format!("Edges emitted: {}", self.edge_count()),
            format!("Neighbors discarded: {}", self.neighbors_discarded),
            format!("Duplicates skipped: {}", self.duplicates_skipped),
            format!("Elapsed: {}ms", self.elapsed.as_millis()),
        ];

        if self.cancelled {
            lines.push("Run cancelled; results are partial".to_string());
        } else if self.anchors_failed > 0 {
            lines.push("Some anchors failed; results are partial".to_string());
        }

        lines.join("\n")
    }
}
