//! Configuration for graph assembly and similarity clustering

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default BFS depth for neighborhood queries
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Number of neighbors returned by a single-node similarity lookup
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

/// Minimum similarity for a single-node lookup
pub const DEFAULT_SIMILAR_FLOOR: f32 = 0.0;

/// Parameters for one similarity clustering run
///
/// # Examples
///
/// ```
/// use rationale_graph::ClusterConfig;
///
/// // Default configuration (balanced)
/// let config = ClusterConfig::default();
/// assert_eq!(config.sample_limit, 50);
///
/// // Wider sampling, more neighbors per anchor
/// let config = ClusterConfig::thorough();
/// assert_eq!(config.sample_limit, 100);
///
/// // Small sample, strict threshold
/// let config = ClusterConfig::fast();
/// assert_eq!(config.sample_limit, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// How many of the most recent decisions are eligible
    /// Default: 100
    pub candidate_pool_size: usize,

    /// How many of the pool (from the newest) are used as anchors
    /// Default: 50
    pub sample_limit: usize,

    /// Neighbors kept per anchor, not counting the anchor itself
    /// Default: 3
    pub top_k_per_anchor: usize,

    /// Emitted edges have similarity strictly greater than this
    /// Default: 0.7
    pub similarity_threshold: f32,

    /// Anchor round trips in flight at once
    /// Default: 4
    pub max_concurrency: usize,

    /// Timeout for each embedding or index call, in milliseconds
    /// Default: 10 000
    pub anchor_timeout_ms: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            candidate_pool_size: 100,
            sample_limit: 50,
            top_k_per_anchor: 3,
            similarity_threshold: 0.7,
            max_concurrency: 4,
            anchor_timeout_ms: 10_000,
        }
    }
}

impl ClusterConfig {
    /// Sample more anchors and keep more neighbors each
    ///
    /// Suitable for offline runs over larger stores.
    pub fn thorough() -> Self {
        Self {
            candidate_pool_size: 200,
            sample_limit: 100,
            top_k_per_anchor: 5,
            similarity_threshold: 0.65,
            max_concurrency: 8,
            anchor_timeout_ms: 20_000,
        }
    }

    /// Few anchors, strict threshold, short timeouts
    ///
    /// Suitable for interactive use against a remote embedding provider.
    pub fn fast() -> Self {
        Self {
            candidate_pool_size: 50,
            sample_limit: 20,
            top_k_per_anchor: 2,
            similarity_threshold: 0.8,
            max_concurrency: 4,
            anchor_timeout_ms: 5_000,
        }
    }

    /// Per-call timeout as Duration
    pub fn anchor_timeout(&self) -> Duration {
        Duration::from_millis(self.anchor_timeout_ms)
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.similarity_threshold) {
            return Err(GraphError::Config(format!(
                "similarity_threshold must be in [0, 1), got {}",
                self.similarity_threshold
            )));
        }
        if self.max_concurrency == 0 {
            return Err(GraphError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.top_k_per_anchor == 0 {
            return Err(GraphError::Config(
                "top_k_per_anchor must be at least 1".to_string(),
            ));
        }
        if self.anchor_timeout_ms == 0 {
            return Err(GraphError::Config(
                "anchor_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which explicit edges survive a topic filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeFilterPolicy {
    /// Keep edges with at least one endpoint in the filtered node set
    #[default]
    EitherEndpoint,

    /// Keep only edges fully inside the filtered node set
    BothEndpoints,
}

impl EdgeFilterPolicy {
    /// Decide whether an edge survives given endpoint membership
    pub fn keeps(self, from_kept: bool, to_kept: bool) -> bool {
        match self {
            EdgeFilterPolicy::EitherEndpoint => from_kept || to_kept,
            EdgeFilterPolicy::BothEndpoints => from_kept && to_kept,
        }
    }
}

/// Top-level engine configuration
///
/// Loaded from TOML:
///
/// ```toml
/// default_depth = 3
/// similar_limit = 5
/// similar_floor = 0.0
/// edge_filter = "either_endpoint"
///
/// [cluster]
/// candidate_pool_size = 100
/// sample_limit = 50
/// top_k_per_anchor = 3
/// similarity_threshold = 0.7
/// max_concurrency = 4
/// anchor_timeout_ms = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Similarity clustering parameters
    pub cluster: ClusterConfig,

    /// Depth used by neighborhood queries when none is given
    pub default_depth: usize,

    /// Neighbors returned by a single-node similarity lookup
    pub similar_limit: usize,

    /// Minimum similarity for a single-node lookup, independent of the
    /// clustering threshold
    pub similar_floor: f32,

    /// Boundary edge policy for topic filters
    pub edge_filter: EdgeFilterPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cluster: ClusterConfig::default(),
            default_depth: DEFAULT_MAX_DEPTH,
            similar_limit: DEFAULT_SIMILAR_LIMIT,
            similar_floor: DEFAULT_SIMILAR_FLOOR,
            edge_filter: EdgeFilterPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)
            .map_err(|e| GraphError::Config(format!("Failed to parse config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GraphError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        self.cluster.validate()?;
        if self.similar_limit == 0 {
            return Err(GraphError::Config(
                "similar_limit must be at least 1".to_string(),
            ));
        }
        if !(-1.0..1.0).contains(&self.similar_floor) {
            return Err(GraphError::Config(format!(
                "similar_floor must be in [-1, 1), got {}",
                self.similar_floor
            )));
        }
        Ok(())
    }
}
