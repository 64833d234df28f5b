//! Rationale Storage Layer
//!
//! Implements the `DecisionStore` trait on SQLite, plus the vector indexes the
//! similarity engine queries.
//!
//! # Architecture
//!
//! - SQLite for decisions, explicit edges and the outcome change log
//! - HNSW ([`vector_index::HnswIndex`]) for approximate nearest neighbors
//! - An exact flat index ([`vector_index::FlatIndex`]) for small sets and tests
//!
//! # Examples
//!
//! ```no_run
//! use rationale_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for decision operations
//! ```

#![warn(missing_docs)]

pub mod vector_index;

pub use vector_index::{FlatIndex, HnswIndex, IndexError};

use async_trait::async_trait;
use rationale_domain::{
    Confidence, Decision, DecisionId, DecisionStore, Edge, NewDecision, Outcome, Relationship,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Decision not found
    #[error("Decision not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Duplicate decision id
    #[error("Duplicate decision: {0}")]
    Duplicate(String),

    /// Connection mutex was poisoned by a panicking writer
    #[error("Store connection lock poisoned")]
    LockPoisoned,
}

/// One entry of the outcome change log
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeChange {
    /// Decision whose outcome changed
    pub decision_id: DecisionId,
    /// New outcome
    pub outcome: Outcome,
    /// Optional justification supplied with the change
    pub reason: Option<String>,
    /// When the change was recorded (milliseconds since Unix epoch)
    pub changed_at: u64,
}

/// SQLite-based implementation of `DecisionStore`
///
/// # Thread Safety
///
/// The connection is guarded by a mutex, so one store can be shared across
/// tasks. Every operation is a short statement; none hold the lock across an
/// await point.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

const DECISION_COLUMNS: &str =
    "id, topic, decision, reasoning, outcome, confidence, created_at";

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rationale_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("rationale.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert a decision with a caller-chosen id and timestamp
    ///
    /// Used for imports and fixtures; regular callers go through
    /// [`DecisionStore::record_decision`].
    pub fn import_decision(&self, decision: &Decision) -> Result<(), StoreError> {
        if decision.id.is_blank() {
            return Err(StoreError::InvalidData("decision id cannot be empty".to_string()));
        }

        let conn = self.conn()?;
        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM decisions WHERE id = ?1",
                params![decision.id.as_str()],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::Duplicate(decision.id.to_string()));
        }

        conn.execute(
            "INSERT INTO decisions (id, topic, decision, reasoning, outcome, confidence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                decision.id.as_str(),
                &decision.topic,
                &decision.decision,
                &decision.reasoning,
                decision.outcome.map(|o| o.as_str()),
                decision.confidence.map(|c| c.value()),
                decision.created_at as i64,
            ],
        )?;

        Ok(())
    }

    /// Outcome changes recorded for a decision, oldest first
    pub fn outcome_history(&self, id: &DecisionId) -> Result<Vec<OutcomeChange>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT decision_id, outcome, reason, changed_at
             FROM outcome_log WHERE decision_id = ?1 ORDER BY seq ASC",
        )?;

        let changes = stmt
            .query_map(params![id.as_str()], |row| {
                let outcome_str: String = row.get(1)?;
                let outcome = parse_outcome_column(&outcome_str, 1)?;
                Ok(OutcomeChange {
                    decision_id: DecisionId::new(row.get::<_, String>(0)?),
                    outcome,
                    reason: row.get(2)?,
                    changed_at: row.get::<_, i64>(3)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(changes)
    }

    fn decision_exists(conn: &Connection, id: &DecisionId) -> Result<bool, StoreError> {
        Ok(conn
            .query_row(
                "SELECT 1 FROM decisions WHERE id = ?1",
                params![id.as_str()],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false))
    }

    fn row_to_decision(row: &Row<'_>) -> rusqlite::Result<Decision> {
        let outcome: Option<String> = row.get(4)?;
        let outcome = outcome
            .map(|s| parse_outcome_column(&s, 4))
            .transpose()?;

        let confidence: Option<f64> = row.get(5)?;
        let confidence = confidence
            .map(|c| {
                Confidence::new(c).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Real,
                        Box::new(StoreError::InvalidData(e)),
                    )
                })
            })
            .transpose()?;

        Ok(Decision {
            id: DecisionId::new(row.get::<_, String>(0)?),
            topic: row.get(1)?,
            decision: row.get(2)?,
            reasoning: row.get(3)?,
            outcome,
            confidence,
            created_at: row.get::<_, i64>(6)? as u64,
        })
    }
}

fn parse_outcome_column(value: &str, column: usize) -> rusqlite::Result<Outcome> {
    Outcome::parse(value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(StoreError::InvalidData(format!("Unknown outcome: {}", value))),
        )
    })
}

/// Current time in milliseconds since Unix epoch
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[async_trait]
impl DecisionStore for SqliteStore {
    type Error = StoreError;

    async fn list_decisions(&self) -> Result<Vec<Decision>, Self::Error> {
        let conn = self.conn()?;
        // Ties on created_at fall back to id so the order is total
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM decisions ORDER BY created_at DESC, id DESC",
            DECISION_COLUMNS
        ))?;

        let decisions = stmt
            .query_map([], Self::row_to_decision)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(decisions)
    }

    async fn list_edges(&self) -> Result<Vec<Edge>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT from_id, to_id, relationship, reason FROM edges
             ORDER BY from_id, to_id, relationship",
        )?;

        let edges = stmt
            .query_map([], |row| {
                let relationship: String = row.get(2)?;
                Ok(Edge {
                    from: DecisionId::new(row.get::<_, String>(0)?),
                    to: DecisionId::new(row.get::<_, String>(1)?),
                    relationship: Relationship::parse(&relationship),
                    reason: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(edges)
    }

    async fn get_decision(&self, id: &DecisionId) -> Result<Option<Decision>, Self::Error> {
        let conn = self.conn()?;
        let decision = conn
            .query_row(
                &format!("SELECT {} FROM decisions WHERE id = ?1", DECISION_COLUMNS),
                params![id.as_str()],
                Self::row_to_decision,
            )
            .optional()?;

        Ok(decision)
    }

    async fn set_outcome(
        &self,
        id: &DecisionId,
        outcome: Outcome,
        reason: Option<&str>,
    ) -> Result<bool, Self::Error> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let updated = tx.execute(
            "UPDATE decisions SET outcome = ?1 WHERE id = ?2",
            params![outcome.as_str(), id.as_str()],
        )?;

        if updated == 0 {
            return Ok(false);
        }

        tx.execute(
            "INSERT INTO outcome_log (decision_id, outcome, reason, changed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id.as_str(), outcome.as_str(), reason, now_millis() as i64],
        )?;
        tx.commit()?;

        tracing::debug!("Outcome of {} set to {}", id, outcome);
        Ok(true)
    }

    async fn record_decision(&self, decision: NewDecision) -> Result<Decision, Self::Error> {
        decision.validate().map_err(StoreError::InvalidData)?;

        let decision = decision.into_decision(DecisionId::generate(), now_millis());
        self.import_decision(&decision)?;
        Ok(decision)
    }

    async fn add_edge(&self, edge: Edge) -> Result<(), Self::Error> {
        if matches!(edge.relationship, Relationship::Similar) {
            return Err(StoreError::InvalidData(
                "similarity edges are derived and cannot be stored".to_string(),
            ));
        }

        let conn = self.conn()?;
        for endpoint in [&edge.from, &edge.to] {
            if !Self::decision_exists(&conn, endpoint)? {
                return Err(StoreError::NotFound(endpoint.to_string()));
            }
        }

        conn.execute(
            "INSERT INTO edges (from_id, to_id, relationship, reason)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(from_id, to_id, relationship) DO UPDATE SET reason = excluded.reason",
            params![
                edge.from.as_str(),
                edge.to.as_str(),
                edge.relationship.as_str(),
                edge.reason.as_deref(),
            ],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(decisions: &[Decision]) -> SqliteStore {
        let store = SqliteStore::new(":memory:").unwrap();
        for d in decisions {
            store.import_decision(d).unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_list_decisions_newest_first() {
        let store = store_with(&[
            Decision::new("old", "infra", "use postgres", "", 100),
            Decision::new("new", "infra", "use postgres cluster", "", 300),
            Decision::new("mid", "ui", "use react", "", 200),
        ]);

        let ids: Vec<String> = store
            .list_decisions()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id.to_string())
            .collect();

        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_duplicate_import_rejected() {
        let d = Decision::new("d1", "infra", "use postgres", "", 100);
        let store = store_with(&[d.clone()]);
        assert!(matches!(store.import_decision(&d), Err(StoreError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_set_outcome_logs_change() {
        let store = store_with(&[Decision::new("d1", "infra", "use postgres", "", 100)]);
        let id = DecisionId::new("d1");

        assert!(store.set_outcome(&id, Outcome::Success, Some("shipped")).await.unwrap());

        let stored = store.get_decision(&id).await.unwrap().unwrap();
        assert_eq!(stored.outcome, Some(Outcome::Success));

        let history = store.outcome_history(&id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reason.as_deref(), Some("shipped"));
    }

    #[tokio::test]
    async fn test_set_outcome_unknown_id() {
        let store = store_with(&[]);
        let updated = store
            .set_outcome(&DecisionId::new("missing"), Outcome::Failed, None)
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_add_edge_requires_endpoints() {
        let store = store_with(&[Decision::new("a", "t", "x", "", 1)]);
        let result = store.add_edge(Edge::new("a", "ghost", Relationship::BuildsOn)).await;
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_similarity_edges_not_stored() {
        let store = store_with(&[
            Decision::new("a", "t", "x", "", 1),
            Decision::new("b", "t", "y", "", 2),
        ]);
        let result = store.add_edge(Edge::new("a", "b", Relationship::Similar)).await;
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_record_decision_assigns_id() {
        let store = store_with(&[]);
        let recorded = store
            .record_decision(NewDecision::new("infra", "use postgres", "mature"))
            .await
            .unwrap();

        assert!(!recorded.id.is_blank());
        assert!(recorded.created_at > 0);
        assert_eq!(store.get_decision(&recorded.id).await.unwrap(), Some(recorded));
    }

    #[tokio::test]
    async fn test_record_decision_validates() {
        let store = store_with(&[]);
        let result = store.record_decision(NewDecision::new("", "x", "")).await;
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }
}
