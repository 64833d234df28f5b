//! Loading decision embeddings into a vector index

use crate::error::{GraphError, Result};
use futures::stream::{self, StreamExt};
use rationale_domain::{Decision, EmbeddingProvider, VectorIndex};
use tracing::{info, warn};

/// Counts from one indexing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexingReport {
    /// Decisions embedded and inserted
    pub indexed: usize,

    /// Decisions whose embedding or insert failed
    pub failed: usize,
}

/// Embed each decision's query text and insert it into `index`
///
/// Failures are logged per decision and counted; they never abort the pass.
pub async fn index_decisions<E, V>(
    embedder: &E,
    index: &V,
    decisions: &[Decision],
    max_concurrency: usize,
) -> IndexingReport
where
    E: EmbeddingProvider,
    V: VectorIndex,
{
    let mut report = IndexingReport::default();

    let mut results = std::pin::pin!(stream::iter(decisions)
        .map(|decision| async move {
            let outcome = index_one(embedder, index, decision).await;
            (decision, outcome)
        })
        .buffer_unordered(max_concurrency.max(1)));

    while let Some((decision, outcome)) = results.next().await {
        match outcome {
            Ok(()) => report.indexed += 1,
            Err(e) => {
                report.failed += 1;
                warn!(id = %decision.id, error = %e, "failed to index decision");
            }
        }
    }

    info!(
        indexed = report.indexed,
        failed = report.failed,
        "vector index loaded"
    );
    report
}

async fn index_one<E, V>(embedder: &E, index: &V, decision: &Decision) -> Result<()>
where
    E: EmbeddingProvider,
    V: VectorIndex,
{
    let vector = embedder
        .embed(&decision.query_text())
        .await
        .map_err(|e| GraphError::dependency("embedding failed", e))?;
    index
        .insert(decision.id.clone(), vector)
        .await
        .map_err(|e| GraphError::dependency("vector insert failed", e))
}
