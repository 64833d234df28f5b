//! Presentation helpers: outcome colors, topic colors and node styling
//!
//! All mappings are pure and deterministic so every client renders the same
//! graph the same way.

use rationale_domain::{Decision, Outcome};
use serde::Serialize;

/// Fixed topic palette (hex RGB)
pub const PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Base node radius
const BASE_SIZE: f64 = 8.0;

/// Extra radius at full confidence
const CONFIDENCE_SIZE: f64 = 12.0;

/// Confidence assumed when none was recorded
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// 32-bit FNV-1a hash
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u32::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Palette slot for a topic
pub fn topic_palette_index(topic: &str) -> usize {
    fnv1a(topic.as_bytes()) as usize % PALETTE.len()
}

/// Palette color for a topic
pub fn topic_color(topic: &str) -> &'static str {
    PALETTE[topic_palette_index(topic)]
}

/// Semantic color of a decision's outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeColor {
    /// Worked out
    Success,
    /// Did not work out
    Failure,
    /// Partly worked out
    Warning,
    /// Pending or unknown
    Neutral,
}

impl OutcomeColor {
    /// Total mapping from an optional outcome
    pub fn for_outcome(outcome: Option<Outcome>) -> Self {
        match outcome {
            Some(Outcome::Success) => OutcomeColor::Success,
            Some(Outcome::Failed) => OutcomeColor::Failure,
            Some(Outcome::Partial) => OutcomeColor::Warning,
            Some(Outcome::Pending) | None => OutcomeColor::Neutral,
        }
    }

    /// Name as used by clients
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeColor::Success => "success",
            OutcomeColor::Failure => "failure",
            OutcomeColor::Warning => "warning",
            OutcomeColor::Neutral => "neutral",
        }
    }

    /// Hex RGB for this color
    pub fn hex(&self) -> &'static str {
        match self {
            OutcomeColor::Success => "#2e7d32",
            OutcomeColor::Failure => "#c62828",
            OutcomeColor::Warning => "#f9a825",
            OutcomeColor::Neutral => "#757575",
        }
    }
}

/// Rendering hints for one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStyle {
    /// Fill color from the topic
    pub fill: &'static str,

    /// Border color from the outcome
    pub border: OutcomeColor,

    /// Radius, growing with confidence
    pub size: f64,
}

impl NodeStyle {
    /// Style a decision
    pub fn for_decision(decision: &Decision) -> Self {
        let confidence = decision
            .confidence
            .map(|c| c.value())
            .unwrap_or(DEFAULT_CONFIDENCE);
        Self {
            fill: topic_color(&decision.topic),
            border: OutcomeColor::for_outcome(decision.outcome),
            size: BASE_SIZE + confidence * CONFIDENCE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rationale_domain::Confidence;

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_topic_color_is_stable() {
        assert_eq!(topic_color("infra"), topic_color("infra"));
        assert!(PALETTE.contains(&topic_color("anything at all")));
        assert!(topic_palette_index("ui") < PALETTE.len());
    }

    #[test]
    fn test_outcome_color_mapping() {
        assert_eq!(OutcomeColor::for_outcome(Some(Outcome::Success)).as_str(), "success");
        assert_eq!(OutcomeColor::for_outcome(Some(Outcome::Failed)).as_str(), "failure");
        assert_eq!(OutcomeColor::for_outcome(Some(Outcome::Partial)).as_str(), "warning");
        assert_eq!(OutcomeColor::for_outcome(Some(Outcome::Pending)).as_str(), "neutral");
        assert_eq!(OutcomeColor::for_outcome(None).as_str(), "neutral");
    }

    #[test]
    fn test_node_style_size_tracks_confidence() {
        let low = Decision::new("a", "t", "x", "", 0).with_confidence(Confidence::new(0.0).unwrap());
        let high = Decision::new("b", "t", "x", "", 0).with_confidence(Confidence::new(1.0).unwrap());
        let unknown = Decision::new("c", "t", "x", "", 0);

        assert_eq!(NodeStyle::for_decision(&low).size, BASE_SIZE);
        assert_eq!(NodeStyle::for_decision(&high).size, BASE_SIZE + CONFIDENCE_SIZE);
        assert_eq!(NodeStyle::for_decision(&unknown).size, BASE_SIZE + 0.5 * CONFIDENCE_SIZE);
        assert_eq!(NodeStyle::for_decision(&unknown).border, OutcomeColor::Neutral);
    }
}
