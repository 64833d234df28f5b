//! Rationale Domain Layer
//!
//! This crate contains the core data model for Rationale, a memory of short
//! decision records ("why we chose X"). It defines the fundamental records,
//! value objects, and the trait interfaces every other layer depends upon.
//!
//! ## Key Concepts
//!
//! - **Decision**: A recorded reasoning unit with a topic, rationale text and an
//!   optional outcome and confidence
//! - **Edge**: An explicit, directed, named relationship between two decisions
//! - **Similarity edge**: An implicit, unordered, ephemeral relationship derived
//!   from embedding closeness
//! - **Outcome**: What eventually happened (`PENDING`, `SUCCESS`, `FAILED`, `PARTIAL`)
//!
//! ## Architecture
//!
//! - Pure data model and validation only
//! - Storage, embedding and vector search live in other crates
//! - Trait definitions for all external interactions live in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod decision;
pub mod outcome;
pub mod relationship;
pub mod traits;
pub mod vector;

// Re-exports for convenience
pub use confidence::Confidence;
pub use decision::{Decision, DecisionId, NewDecision};
pub use outcome::Outcome;
pub use relationship::{Edge, PairKey, Relationship, SimilarityEdge};
pub use traits::{DecisionStore, EmbeddingProvider, Neighbor, VectorIndex};
