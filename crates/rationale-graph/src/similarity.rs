//! Similarity Graph Builder
//!
//! Derives implicit "similar" edges from a snapshot of decisions. The most
//! recent decisions are used as anchors; each anchor's `topic decision` text
//! is embedded and looked up in the vector index, and every sufficiently
//! close neighbor becomes one edge. Each unordered pair is emitted at most
//! once per run.
//!
//! Anchor round trips run concurrently (bounded by `max_concurrency`) but
//! their results are reduced in anchor order by a single loop that owns the
//! seen-pair set, so output is deterministic for a fixed provider and index.
//! A failing anchor is logged and skipped; the rest of the run continues.

use crate::config::ClusterConfig;
use crate::error::{GraphError, Result};
use crate::metrics::ClusterReport;
use futures::stream::{self, StreamExt};
use rationale_domain::{
    Decision, EmbeddingProvider, Neighbor, PairKey, SimilarityEdge, VectorIndex,
};
use std::collections::HashSet;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Computes similarity edges using an embedding provider and a vector index
pub struct SimilarityGraphBuilder<'a, E, V> {
    embedder: &'a E,
    index: &'a V,
    config: &'a ClusterConfig,
}

impl<'a, E, V> SimilarityGraphBuilder<'a, E, V>
where
    E: EmbeddingProvider,
    V: VectorIndex,
{
    /// Create a builder over borrowed collaborators
    pub fn new(embedder: &'a E, index: &'a V, config: &'a ClusterConfig) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    /// Run clustering to completion
    pub async fn build(&self, decisions: &[Decision]) -> ClusterReport {
        self.build_with_cancel(decisions, &CancellationToken::new())
            .await
    }

    /// Run clustering until done or until `cancel` fires
    ///
    /// `decisions` must be ordered newest first. On cancellation, in-flight
    /// anchor calls are dropped and the edges collected so far are returned
    /// with `cancelled` set.
    pub async fn build_with_cancel(
        &self,
        decisions: &[Decision],
        cancel: &CancellationToken,
    ) -> ClusterReport {
        let started = Instant::now();
        let pool = &decisions[..decisions.len().min(self.config.candidate_pool_size)];
        let anchors = &pool[..pool.len().min(self.config.sample_limit)];

        let mut report = ClusterReport::new(anchors.len());
        let mut seen: HashSet<PairKey> = HashSet::new();

        info!(
            anchors = anchors.len(),
            threshold = self.config.similarity_threshold,
            concurrency = self.config.max_concurrency,
            "similarity clustering started"
        );

        let k = self.config.top_k_per_anchor + 1;
        let threshold = self.config.similarity_threshold;
        let mut results = std::pin::pin!(stream::iter(anchors)
            .map(|anchor| async move {
                let hits = self.nearest(&anchor.query_text(), k, threshold).await;
                (anchor, hits)
            })
            .buffered(self.config.max_concurrency.max(1)));

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                next = results.next() => next,
            };

            let Some((anchor, hits)) = next else {
                break;
            };
            report.anchors_processed += 1;

            match hits {
                Ok(neighbors) => self.absorb(anchor, neighbors, &mut seen, &mut report),
                Err(e) => {
                    report.anchors_failed += 1;
                    warn!(anchor = %anchor.id, error = %e, "anchor lookup failed, continuing");
                }
            }
        }

        report.elapsed = started.elapsed();
        if report.cancelled {
            warn!(
                processed = report.anchors_processed,
                edges = report.edge_count(),
                "similarity clustering cancelled"
            );
        } else {
            info!(
                edges = report.edge_count(),
                failed = report.anchors_failed,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "similarity clustering finished"
            );
        }
        report
    }

    /// Nearest neighbors of one decision with similarity `>= floor`,
    /// excluding itself
    ///
    /// Unlike [`build`](Self::build), failures are returned to the caller.
    /// The clustering threshold does not apply here.
    pub async fn similar_to(
        &self,
        decision: &Decision,
        limit: usize,
        floor: f32,
    ) -> Result<Vec<Neighbor>> {
        let mut hits = self
            .nearest(&decision.query_text(), limit + 1, floor)
            .await?;
        hits.retain(|n| n.id != decision.id);
        hits.truncate(limit);
        Ok(hits)
    }

    /// Embed `text` and query the index, each call under its own timeout
    async fn nearest(&self, text: &str, k: usize, min_similarity: f32) -> Result<Vec<Neighbor>> {
        let timeout = self.config.anchor_timeout();

        let vector = with_timeout(timeout, "embedding", self.embedder.embed(text))
            .await?
            .map_err(|e| GraphError::dependency("embedding failed", e))?;

        with_timeout(
            timeout,
            "vector query",
            self.index.query(&vector, k, min_similarity),
        )
        .await?
        .map_err(|e| GraphError::dependency("vector query failed", e))
    }

    fn absorb(
        &self,
        anchor: &Decision,
        neighbors: Vec<Neighbor>,
        seen: &mut HashSet<PairKey>,
        report: &mut ClusterReport,
    ) {
        let threshold = self.config.similarity_threshold;
        let before = report.edges.len();

        for neighbor in neighbors {
            // NaN compares false, so it is discarded along with weak matches
            let above = neighbor.similarity > threshold;
            if neighbor.id == anchor.id || !above {
                report.neighbors_discarded += 1;
                continue;
            }

            if !seen.insert(PairKey::new(&anchor.id, &neighbor.id)) {
                report.duplicates_skipped += 1;
                continue;
            }

            report.edges.push(SimilarityEdge::new(
                anchor.id.clone(),
                neighbor.id,
                neighbor.similarity,
            ));
        }

        debug!(
            anchor = %anchor.id,
            emitted = report.edges.len() - before,
            "anchor reduced"
        );
    }
}

async fn with_timeout<F: Future>(limit: Duration, what: &str, fut: F) -> Result<F::Output> {
    tokio::time::timeout(limit, fut).await.map_err(|_| {
        GraphError::Dependency(format!("{} timed out after {}ms", what, limit.as_millis()))
    })
}
