//! Outcome Mutator
//!
//! Normalizes outcome input and applies it to in-memory nodes and the store.

use crate::error::{GraphError, Result};
use rationale_domain::{Decision, DecisionId, DecisionStore, Outcome};
use tracing::info;

/// A validated outcome change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeUpdate {
    /// Decision to update
    pub id: DecisionId,

    /// New outcome
    pub outcome: Outcome,

    /// Optional note stored in the outcome history
    pub reason: Option<String>,
}

impl OutcomeUpdate {
    /// Validate raw input
    ///
    /// The outcome is trimmed and upper-cased; a blank `reason` counts as none.
    ///
    /// # Errors
    /// `missing_node_id` for a blank id, `invalid_outcome` for anything that
    /// is not `PENDING`, `SUCCESS`, `FAILED` or `PARTIAL`.
    pub fn parse(node_id: &str, raw_outcome: &str, reason: Option<&str>) -> Result<Self> {
        let id = require_node_id(node_id)?;
        let outcome = Outcome::parse(raw_outcome).ok_or_else(|| {
            GraphError::validation(
                "invalid_outcome",
                format!(
                    "invalid outcome {:?}; expected one of PENDING, SUCCESS, FAILED, PARTIAL",
                    raw_outcome
                ),
            )
        })?;
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(Self {
            id,
            outcome,
            reason,
        })
    }

    /// Apply to the matching node in `nodes`; false when absent
    pub fn apply_to(&self, nodes: &mut [Decision]) -> bool {
        match nodes.iter_mut().find(|d| d.id == self.id) {
            Some(node) => {
                node.outcome = Some(self.outcome);
                true
            }
            None => false,
        }
    }

    /// Write the change to the store
    ///
    /// # Errors
    /// `NotFound` when the store has no such decision, `Store` on failure.
    pub async fn persist<S: DecisionStore>(&self, store: &S) -> Result<()> {
        let found = store
            .set_outcome(&self.id, self.outcome, self.reason.as_deref())
            .await
            .map_err(GraphError::store)?;

        if !found {
            return Err(GraphError::NotFound(self.id.clone()));
        }

        info!(id = %self.id, outcome = %self.outcome, "outcome updated");
        Ok(())
    }
}

/// Trimmed, non-blank node id
pub fn require_node_id(raw: &str) -> Result<DecisionId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GraphError::missing_node_id());
    }
    Ok(DecisionId::new(trimmed))
}
