//! Decision module - the fundamental unit of Rationale's memory

use crate::{Confidence, Outcome};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque, stable identifier of a decision
///
/// Identifiers are treated as plain strings by the engine. Stores that mint
/// their own identifiers use UUIDv7 so ids sort chronologically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(String);

impl DecisionId {
    /// Wrap an existing identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use rationale_domain::DecisionId;
    ///
    /// let id = DecisionId::new("d1");
    /// assert_eq!(id.as_str(), "d1");
    /// ```
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Mint a fresh UUIDv7-based identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DecisionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DecisionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for DecisionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A decision - one node of the decision graph
///
/// Field names match the JSON contract (`id`, `topic`, `decision`,
/// `reasoning`, `outcome`, `confidence`, `created_at`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Unique identifier
    pub id: DecisionId,

    /// Topic the decision belongs to (e.g. "infra")
    pub topic: String,

    /// What was decided
    pub decision: String,

    /// Why it was decided
    #[serde(default)]
    pub reasoning: String,

    /// What happened afterwards, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,

    /// Confidence at decision time, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,

    /// Creation time (milliseconds since Unix epoch)
    pub created_at: u64,
}

impl Decision {
    /// Create a decision with no outcome or confidence
    pub fn new(
        id: impl Into<DecisionId>,
        topic: impl Into<String>,
        decision: impl Into<String>,
        reasoning: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            decision: decision.into(),
            reasoning: reasoning.into(),
            outcome: None,
            confidence: None,
            created_at,
        }
    }

    /// Set the outcome (builder style)
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Set the confidence (builder style)
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Text used to embed this decision for similarity search: `topic + " " + decision`
    pub fn query_text(&self) -> String {
        format!("{} {}", self.topic, self.decision)
    }

    /// Case-insensitive substring match against topic, decision and reasoning
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.topic.to_lowercase().contains(needle)
            || self.decision.to_lowercase().contains(needle)
            || self.reasoning.to_lowercase().contains(needle)
    }
}

/// Input for recording a new decision; the store assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDecision {
    /// Topic
    pub topic: String,

    /// What was decided
    pub decision: String,

    /// Why
    #[serde(default)]
    pub reasoning: String,

    /// Initial outcome, usually absent
    #[serde(default)]
    pub outcome: Option<Outcome>,

    /// Confidence at decision time
    #[serde(default)]
    pub confidence: Option<Confidence>,
}

impl NewDecision {
    /// Create a new decision input
    pub fn new(
        topic: impl Into<String>,
        decision: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            decision: decision.into(),
            reasoning: reasoning.into(),
            outcome: None,
            confidence: None,
        }
    }

    /// Validate required fields
    ///
    /// # Errors
    /// Returns an error naming the first missing field
    pub fn validate(&self) -> Result<(), String> {
        if self.topic.trim().is_empty() {
            return Err("topic is required".to_string());
        }
        if self.decision.trim().is_empty() {
            return Err("decision is required".to_string());
        }
        Ok(())
    }

    /// Turn this input into a stored decision
    pub fn into_decision(self, id: DecisionId, created_at: u64) -> Decision {
        Decision {
            id,
            topic: self.topic,
            decision: self.decision,
            reasoning: self.reasoning,
            outcome: self.outcome,
            confidence: self.confidence,
            created_at,
        }
    }
}
