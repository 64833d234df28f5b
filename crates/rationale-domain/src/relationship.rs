//! Relationship module - explicit and implicit edges between decisions

use crate::DecisionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of relationship between decisions
///
/// The set is open: unknown names round-trip through [`Relationship::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Relationship {
    /// A newer decision replaces an older one
    Supersedes,

    /// A decision extends an earlier one
    BuildsOn,

    /// Two decisions argue with each other
    Debates,

    /// A decision combines several others
    Synthesizes,

    /// Implicit closeness derived from embeddings (never stored)
    Similar,

    /// Any other caller-defined relationship name
    Other(String),
}

impl Relationship {
    /// Get the relationship name as stored and serialized
    pub fn as_str(&self) -> &str {
        match self {
            Relationship::Supersedes => "supersedes",
            Relationship::BuildsOn => "builds_on",
            Relationship::Debates => "debates",
            Relationship::Synthesizes => "synthesizes",
            Relationship::Similar => "similar",
            Relationship::Other(name) => name,
        }
    }

    /// Parse a relationship name (case-insensitive for the known names)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "supersedes" => Relationship::Supersedes,
            "builds_on" => Relationship::BuildsOn,
            "debates" => Relationship::Debates,
            "synthesizes" => Relationship::Synthesizes,
            "similar" => Relationship::Similar,
            _ => Relationship::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for Relationship {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Relationship> for String {
    fn from(relationship: Relationship) -> Self {
        relationship.as_str().to_string()
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An explicit, directed relationship between two decisions
///
/// Several edges may connect the same pair as long as their relationships differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source decision
    pub from: DecisionId,

    /// Target decision
    pub to: DecisionId,

    /// Relationship name
    pub relationship: Relationship,

    /// Optional free-text justification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Edge {
    /// Create a new edge without a reason
    pub fn new(
        from: impl Into<DecisionId>,
        to: impl Into<DecisionId>,
        relationship: Relationship,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relationship,
            reason: None,
        }
    }

    /// Attach a reason (builder style)
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// An implicit "similar" edge produced by a clustering run
///
/// Conceptually undirected: `from` is the anchor that discovered the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEdge {
    /// Anchor decision
    pub from: DecisionId,

    /// Neighbor decision
    pub to: DecisionId,

    /// Always [`Relationship::Similar`]
    pub relationship: Relationship,

    /// Cosine similarity reported by the vector index
    pub similarity: f32,
}

impl SimilarityEdge {
    /// Create a similarity edge
    pub fn new(from: DecisionId, to: DecisionId, similarity: f32) -> Self {
        Self {
            from,
            to,
            relationship: Relationship::Similar,
            similarity,
        }
    }

    /// Canonical key of the unordered pair this edge connects
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.from, &self.to)
    }
}

/// Canonical representation of an unordered pair of decisions
///
/// The two ids are stored sorted, so `PairKey::new(a, b) == PairKey::new(b, a)`.
/// Keeping the ids apart (rather than only a joined string) means ids that
/// contain the separator can never collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey(DecisionId, DecisionId);

impl PairKey {
    /// Separator used by the [`fmt::Display`] form
    pub const SEPARATOR: &'static str = "::";

    /// Build the canonical key for `{a, b}`
    pub fn new(a: &DecisionId, b: &DecisionId) -> Self {
        if a <= b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.0, Self::SEPARATOR, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_roundtrip_known_names() {
        for name in ["supersedes", "builds_on", "debates", "synthesizes", "similar"] {
            assert_eq!(Relationship::parse(name).as_str(), name);
        }
    }

    #[test]
    fn test_relationship_open_set() {
        let rel = Relationship::parse("inspired_by");
        assert_eq!(rel, Relationship::Other("inspired_by".to_string()));
        assert_eq!(rel.as_str(), "inspired_by");
    }

    #[test]
    fn test_edge_json_contract() {
        let edge = Edge::new("a", "b", Relationship::BuildsOn).with_reason("extends caching");
        let value = serde_json::to_value(&edge).unwrap();

        assert_eq!(value["from"], "a");
        assert_eq!(value["to"], "b");
        assert_eq!(value["relationship"], "builds_on");
        assert_eq!(value["reason"], "extends caching");
    }

    #[test]
    fn test_similarity_edge_relationship() {
        let edge = SimilarityEdge::new("d1".into(), "d2".into(), 0.82);
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value["relationship"], "similar");
    }

    #[test]
    fn test_pair_key_is_unordered() {
        let a = DecisionId::new("a");
        let b = DecisionId::new("b");
        assert_eq!(PairKey::new(&a, &b), PairKey::new(&b, &a));
        assert_eq!(PairKey::new(&b, &a).to_string(), "a::b");
    }

    #[test]
    fn test_pair_key_no_separator_collision() {
        let k1 = PairKey::new(&"a::b".into(), &"c".into());
        let k2 = PairKey::new(&"a".into(), &"b::c".into());
        assert_ne!(k1, k2);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the pair key does not depend on argument order
        #[test]
        fn test_pair_key_symmetric(a in "[a-z0-9]{1,8}", b in "[a-z0-9]{1,8}") {
            let a = DecisionId::new(a);
            let b = DecisionId::new(b);
            prop_assert_eq!(PairKey::new(&a, &b), PairKey::new(&b, &a));
        }
    }
}
