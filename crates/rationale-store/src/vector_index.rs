//! Vector Indexes for Semantic Search
//!
//! Two implementations of the `VectorIndex` trait:
//!
//! - [`HnswIndex`]: approximate nearest neighbors over an HNSW graph
//! - [`FlatIndex`]: exact brute-force cosine scan, for small sets and tests
//!
//! # HNSW Parameters
//!
//! - **M**: Number of bi-directional links per node (default: 16)
//!   Higher M = better accuracy but more memory
//! - **efConstruction**: Size of dynamic candidate list during construction (default: 200)
//!   Higher efConstruction = better index quality but slower build
//! - **efSearch**: Size of dynamic candidate list during search (default: 64)
//!   Higher efSearch = better recall but slower queries

use async_trait::async_trait;
use hnsw_rs::prelude::*;
use rationale_domain::vector::cosine_similarity;
use rationale_domain::{DecisionId, Neighbor, VectorIndex};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use thiserror::Error;

/// Default HNSW parameters
const DEFAULT_M: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const DEFAULT_EF_SEARCH: usize = 64;
const DEFAULT_MAX_ELEMENTS: usize = 100_000;

/// Errors that can occur during vector index operations
#[derive(Error, Debug)]
pub enum IndexError {
    /// Invalid embedding dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// Internal index error
    #[error("Index error: {0}")]
    Internal(String),
}

fn check_dimension(expected: usize, actual: usize) -> Result<(), IndexError> {
    if expected != actual {
        return Err(IndexError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

fn poisoned<T>(_: T) -> IndexError {
    IndexError::Internal("index lock poisoned".to_string())
}

struct HnswState {
    hnsw: Hnsw<'static, f32, DistCosine>,
    /// Internal HNSW id -> decision. Replaced vectors leave their old
    /// internal id unmapped, which hides them from results.
    by_internal: HashMap<usize, DecisionId>,
    by_decision: HashMap<DecisionId, usize>,
    next_id: usize,
}

impl HnswState {
    fn empty(max_elements: usize) -> Self {
        let nb_layer = 16.min((max_elements as f32).ln().trunc() as usize);
        Self {
            hnsw: Hnsw::new(
                DEFAULT_M,
                max_elements,
                nb_layer,
                DEFAULT_EF_CONSTRUCTION,
                DistCosine {},
            ),
            by_internal: HashMap::new(),
            by_decision: HashMap::new(),
            next_id: 0,
        }
    }
}

/// A wrapper around HNSW for approximate similarity search
///
/// # Examples
///
/// ```no_run
/// use rationale_store::HnswIndex;
/// use rationale_domain::{DecisionId, VectorIndex};
///
/// # async fn demo() -> Result<(), rationale_store::IndexError> {
/// let index = HnswIndex::new(384);
/// index.insert(DecisionId::new("d1"), vec![0.1; 384]).await?;
///
/// let hits = index.query(&vec![0.1; 384], 5, 0.7).await?;
/// # Ok(())
/// # }
/// ```
pub struct HnswIndex {
    dimension: usize,
    max_elements: usize,
    ef_search: usize,
    state: Mutex<HnswState>,
}

impl HnswIndex {
    /// Create a new index with the specified dimension and default capacity
    pub fn new(dimension: usize) -> Self {
        Self::with_capacity(dimension, DEFAULT_MAX_ELEMENTS)
    }

    /// Create a new index sized for `max_elements` vectors
    pub fn with_capacity(dimension: usize, max_elements: usize) -> Self {
        Self {
            dimension,
            max_elements,
            ef_search: DEFAULT_EF_SEARCH,
            state: Mutex::new(HnswState::empty(max_elements)),
        }
    }

    /// Embedding dimension this index accepts
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of live vectors in the index
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.by_decision.len()).unwrap_or(0)
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

}

#[async_trait]
impl VectorIndex for HnswIndex {
    type Error = IndexError;

    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        min_similarity: f32,
    ) -> Result<Vec<Neighbor>, Self::Error> {
        check_dimension(self.dimension, vector.len())?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let state = self.state.lock().map_err(poisoned)?;
        // Ask for extra candidates so replaced vectors don't starve the result
        let stale = state.next_id - state.by_decision.len();
        let knbn = k + stale;
        let ef = self.ef_search.max(knbn);

        let mut hits: Vec<Neighbor> = state
            .hnsw
            .search(vector, knbn, ef)
            .into_iter()
            .filter_map(|n| {
                state.by_internal.get(&n.d_id).map(|id| {
                    // HNSW returns cosine distance; similarity = 1 - distance
                    Neighbor::new(id.clone(), 1.0 - n.distance)
                })
            })
            .filter(|n| n.similarity >= min_similarity)
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(k);
        Ok(hits)
    }

    async fn insert(&self, id: DecisionId, vector: Vec<f32>) -> Result<(), Self::Error> {
        check_dimension(self.dimension, vector.len())?;

        let mut state = self.state.lock().map_err(poisoned)?;
        if state.next_id >= self.max_elements {
            return Err(IndexError::Internal(format!(
                "index capacity of {} vectors exhausted",
                self.max_elements
            )));
        }

        let internal_id = state.next_id;
        state.next_id += 1;

        if let Some(previous) = state.by_decision.insert(id.clone(), internal_id) {
            state.by_internal.remove(&previous);
        }
        state.by_internal.insert(internal_id, id);
        state.hnsw.insert((vector.as_slice(), internal_id));

        Ok(())
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        // HNSW has no delete, so the graph is rebuilt from scratch
        let mut state = self.state.lock().map_err(poisoned)?;
        *state = HnswState::empty(self.max_elements);
        Ok(())
    }
}

/// Exact nearest-neighbor index using a linear cosine scan
///
/// O(n) per query; intended for a few thousand vectors at most.
pub struct FlatIndex {
    dimension: usize,
    vectors: RwLock<HashMap<DecisionId, Vec<f32>>>,
}

impl FlatIndex {
    /// Create an empty flat index
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: RwLock::new(HashMap::new()),
        }
    }

    /// Number of vectors stored
    pub fn len(&self) -> usize {
        self.vectors.read().map(|v| v.len()).unwrap_or(0)
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VectorIndex for FlatIndex {
    type Error = IndexError;

    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        min_similarity: f32,
    ) -> Result<Vec<Neighbor>, Self::Error> {
        check_dimension(self.dimension, vector.len())?;

        let vectors = self.vectors.read().map_err(poisoned)?;
        let mut hits: Vec<Neighbor> = vectors
            .iter()
            .map(|(id, stored)| Neighbor::new(id.clone(), cosine_similarity(vector, stored)))
            .filter(|n| n.similarity >= min_similarity)
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(k);
        Ok(hits)
    }

    async fn insert(&self, id: DecisionId, vector: Vec<f32>) -> Result<(), Self::Error> {
        check_dimension(self.dimension, vector.len())?;
        self.vectors.write().map_err(poisoned)?.insert(id, vector);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        self.vectors.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(dim: usize, i: usize) -> Vec<f32> {
        let mut v = vec![0.0; dim];
        v[i] = 1.0;
        v
    }

    #[tokio::test]
    async fn test_hnsw_creation() {
        let index = HnswIndex::new(384);
        assert_eq!(index.dimension(), 384);
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_hnsw_cosine_ranking() {
        let index = HnswIndex::new(3);
        index.insert("x".into(), vec![1.0, 0.0, 0.0]).await.unwrap();
        index.insert("y".into(), vec![0.0, 1.0, 0.0]).await.unwrap();
        index.insert("xy".into(), vec![0.7071, 0.7071, 0.0]).await.unwrap();

        let hits = index.query(&[1.0, 0.0, 0.0], 3, -1.0).await.unwrap();

        assert_eq!(hits[0].id.as_str(), "x");
        assert!(hits[0].similarity > 0.99);
        assert_eq!(hits[1].id.as_str(), "xy");
        assert!(hits[1].similarity > 0.5);
        assert_eq!(hits[2].id.as_str(), "y");
        assert!(hits[2].similarity < 0.1);
    }

    #[tokio::test]
    async fn test_hnsw_min_similarity_floor() {
        let index = HnswIndex::new(3);
        index.insert("x".into(), vec![1.0, 0.0, 0.0]).await.unwrap();
        index.insert("y".into(), vec![0.0, 1.0, 0.0]).await.unwrap();

        let hits = index.query(&[1.0, 0.0, 0.0], 5, 0.7).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "x");
    }

    #[tokio::test]
    async fn test_hnsw_replace_hides_old_vector() {
        let index = HnswIndex::new(3);
        index.insert("x".into(), vec![1.0, 0.0, 0.0]).await.unwrap();
        index.insert("x".into(), vec![0.0, 1.0, 0.0]).await.unwrap();

        assert_eq!(index.len(), 1);
        let hits = index.query(&[1.0, 0.0, 0.0], 5, 0.5).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_hnsw_dimension_mismatch() {
        let index = HnswIndex::new(384);
        let result = index.insert("x".into(), vec![0.1; 128]).await;
        assert!(matches!(result, Err(IndexError::DimensionMismatch { .. })));
    }

    #[tokio::test]
    async fn test_hnsw_clear() {
        let index = HnswIndex::new(4);
        index.insert("x".into(), axis(4, 0)).await.unwrap();
        assert_eq!(index.len(), 1);

        index.clear().await.unwrap();
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_hnsw_clear_releases_capacity() {
        let index = HnswIndex::with_capacity(4, 3);
        for round in 0..4 {
            index.clear().await.unwrap();
            for i in 0..3 {
                index
                    .insert(format!("d{}", i).into(), axis(4, i))
                    .await
                    .unwrap_or_else(|e| panic!("round {} insert {}: {}", round, i, e));
            }
            assert_eq!(index.len(), 3);
        }

        let hits = index.query(&axis(4, 1), 3, 0.5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "d1");
    }

    #[tokio::test]
    async fn test_hnsw_replacement_counts_toward_capacity() {
        let index = HnswIndex::with_capacity(4, 2);
        index.insert("x".into(), axis(4, 0)).await.unwrap();
        index.insert("x".into(), axis(4, 1)).await.unwrap();

        let result = index.insert("y".into(), axis(4, 2)).await;
        assert!(matches!(result, Err(IndexError::Internal(_))));
    }

    #[tokio::test]
    async fn test_flat_exact_ranking_and_limit() {
        let index = FlatIndex::new(4);
        index.insert("a".into(), axis(4, 0)).await.unwrap();
        index.insert("b".into(), vec![0.9, 0.1, 0.0, 0.0]).await.unwrap();
        index.insert("c".into(), axis(4, 1)).await.unwrap();

        let hits = index.query(&axis(4, 0), 2, 0.0).await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_flat_not_self_filtered() {
        let index = FlatIndex::new(2);
        index.insert("self".into(), vec![1.0, 0.0]).await.unwrap();

        let hits = index.query(&[1.0, 0.0], 1, 0.9).await.unwrap();
        assert_eq!(hits[0].id.as_str(), "self");
    }

    #[tokio::test]
    async fn test_flat_clear() {
        let index = FlatIndex::new(2);
        index.insert("a".into(), vec![1.0, 0.0]).await.unwrap();
        index.clear().await.unwrap();

        assert!(index.is_empty());
        assert!(index.query(&[1.0, 0.0], 5, -1.0).await.unwrap().is_empty());
    }
}
