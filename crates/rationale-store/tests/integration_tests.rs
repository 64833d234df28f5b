//! Integration tests for rationale-store
//!
//! These tests verify the full cycle for decisions, edges and outcomes,
//! including persistence to an on-disk database.

use rationale_domain::{
    Confidence, Decision, DecisionId, DecisionStore, Edge, NewDecision, Outcome, Relationship,
};
use rationale_store::SqliteStore;
use tempfile::TempDir;

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[tokio::test]
async fn test_import_and_get_decision() {
    let store = SqliteStore::new(":memory:").unwrap();

    let decision = Decision::new("d1", "infra", "use postgres", "team knows SQL", 100)
        .with_outcome(Outcome::Pending)
        .with_confidence(Confidence::new(0.8).unwrap());

    store.import_decision(&decision).unwrap();

    let retrieved = store.get_decision(&DecisionId::new("d1")).await.unwrap();
    assert_eq!(retrieved, Some(decision));
}

#[tokio::test]
async fn test_get_missing_decision() {
    let store = SqliteStore::new(":memory:").unwrap();
    let retrieved = store.get_decision(&DecisionId::new("nope")).await.unwrap();
    assert!(retrieved.is_none());
}

#[tokio::test]
async fn test_multiple_relationships_between_same_pair() {
    let store = SqliteStore::new(":memory:").unwrap();
    store.import_decision(&Decision::new("a", "infra", "x", "", 1)).unwrap();
    store.import_decision(&Decision::new("b", "infra", "y", "", 2)).unwrap();

    store.add_edge(Edge::new("b", "a", Relationship::Supersedes)).await.unwrap();
    store
        .add_edge(Edge::new("b", "a", Relationship::BuildsOn).with_reason("keeps schema"))
        .await
        .unwrap();
    // Same triple again only updates the reason
    store
        .add_edge(Edge::new("b", "a", Relationship::BuildsOn).with_reason("keeps schema v2"))
        .await
        .unwrap();

    let edges = store.list_edges().await.unwrap();
    assert_eq!(edges.len(), 2);

    let builds_on = edges
        .iter()
        .find(|e| e.relationship == Relationship::BuildsOn)
        .unwrap();
    assert_eq!(builds_on.reason.as_deref(), Some("keeps schema v2"));
}

#[tokio::test]
async fn test_custom_relationship_roundtrip() {
    let store = SqliteStore::new(":memory:").unwrap();
    store.import_decision(&Decision::new("a", "t", "x", "", 1)).unwrap();
    store.import_decision(&Decision::new("b", "t", "y", "", 2)).unwrap();

    store
        .add_edge(Edge::new("a", "b", Relationship::parse("inspired_by")))
        .await
        .unwrap();

    let edges = store.list_edges().await.unwrap();
    assert_eq!(edges[0].relationship, Relationship::Other("inspired_by".to_string()));
}

#[tokio::test]
async fn test_outcome_history_order() {
    let store = SqliteStore::new(":memory:").unwrap();
    store.import_decision(&Decision::new("d1", "infra", "use postgres", "", 1)).unwrap();
    let id = DecisionId::new("d1");

    store.set_outcome(&id, Outcome::Pending, None).await.unwrap();
    store.set_outcome(&id, Outcome::Partial, Some("slow queries")).await.unwrap();
    store.set_outcome(&id, Outcome::Success, Some("tuned")).await.unwrap();

    let history: Vec<Outcome> = store
        .outcome_history(&id)
        .unwrap()
        .into_iter()
        .map(|c| c.outcome)
        .collect();
    assert_eq!(history, vec![Outcome::Pending, Outcome::Partial, Outcome::Success]);
}

#[tokio::test]
async fn test_persistence_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rationale.db");

    let recorded = {
        let store = SqliteStore::new(&path).unwrap();
        let d = store
            .record_decision(NewDecision::new("infra", "use postgres", "mature"))
            .await
            .unwrap();
        store.set_outcome(&d.id, Outcome::Success, None).await.unwrap();
        d
    };

    let reopened = SqliteStore::new(&path).unwrap();
    let decisions = reopened.list_decisions().await.unwrap();

    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].id, recorded.id);
    assert_eq!(decisions[0].outcome, Some(Outcome::Success));
}
