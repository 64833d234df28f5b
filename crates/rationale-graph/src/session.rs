//! Per-client view over one assembled graph
//!
//! A session owns an immutable payload plus the derived adjacency and search
//! state. Traversal and search are synchronous and never touch the store.

use crate::assembler::GraphPayload;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::outcome::OutcomeUpdate;
use crate::search::SearchIndex;
use crate::traversal::{Adjacency, Highlight};
use rationale_domain::{Decision, DecisionId};
use std::collections::HashSet;
use std::sync::Arc;

/// Navigation state for one payload
#[derive(Debug, Clone)]
pub struct GraphSession {
    payload: Arc<GraphPayload>,
    adjacency: Adjacency,
    search: SearchIndex,
    default_depth: usize,
}

impl GraphSession {
    /// Start a session over `payload`
    pub fn new(payload: GraphPayload) -> Self {
        Self::from_shared(Arc::new(payload))
    }

    /// Start a session over a payload shared with other sessions
    pub fn from_shared(payload: Arc<GraphPayload>) -> Self {
        let adjacency = Adjacency::from_edges(&payload.edges);
        Self {
            payload,
            adjacency,
            search: SearchIndex::new(),
            default_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the depth used by [`neighborhood`](Self::neighborhood)
    pub fn with_default_depth(mut self, depth: usize) -> Self {
        self.default_depth = depth;
        self
    }

    /// The payload
    pub fn payload(&self) -> &GraphPayload {
        &self.payload
    }

    /// A shared handle to the payload
    pub fn shared(&self) -> Arc<GraphPayload> {
        Arc::clone(&self.payload)
    }

    /// Explicit-edge adjacency
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Look up a node
    pub fn node(&self, id: &DecisionId) -> Option<&Decision> {
        self.payload.node(id)
    }

    /// Nodes within `max_depth` hops of `root` over explicit edges
    pub fn reachable(&self, root: &DecisionId, max_depth: usize) -> HashSet<DecisionId> {
        self.adjacency.reachable(root, max_depth)
    }

    /// Nodes within the default depth of `root`
    pub fn neighborhood(&self, root: &DecisionId) -> HashSet<DecisionId> {
        self.reachable(root, self.default_depth)
    }

    /// Emphasis set for a focused node
    pub fn highlight(&self, root: &DecisionId, depth: usize) -> Highlight {
        Highlight::compute(&self.adjacency, root, depth)
    }

    /// Run a search over the payload's nodes; returns the match count
    pub fn search(&mut self, query: &str) -> usize {
        self.search.search(query, &self.payload.nodes)
    }

    /// Search state
    pub fn search_index(&self) -> &SearchIndex {
        &self.search
    }

    /// Drop the current search
    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Node under the search cursor
    pub fn current_match(&self) -> Option<&Decision> {
        let id = self.search.current()?;
        self.payload.node(id)
    }

    /// Advance to the next match, wrapping around
    pub fn next_match(&mut self) -> Option<&Decision> {
        self.search.next()?;
        self.current_match()
    }

    /// Step back to the previous match, wrapping around
    pub fn previous_match(&mut self) -> Option<&Decision> {
        self.search.previous()?;
        self.current_match()
    }

    /// Apply an outcome change to this session's copy of the payload
    ///
    /// Other holders of the shared payload keep the old value. Returns
    /// false when the node is not in this payload.
    pub fn apply_outcome(&mut self, update: &OutcomeUpdate) -> bool {
        if self.payload.node(&update.id).is_none() {
            return false;
        }
        update.apply_to(&mut Arc::make_mut(&mut self.payload).nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::GraphAssembler;
    use rationale_domain::{Edge, Outcome, Relationship};

    fn session() -> GraphSession {
        let decisions = vec![
            Decision::new("a", "infra", "Use Postgres", "", 4),
            Decision::new("b", "infra", "Add read replica", "postgres load", 3),
            Decision::new("c", "ops", "Page on replica lag", "", 2),
            Decision::new("d", "ops", "Weekly failover drill", "", 1),
        ];
        let edges = vec![
            Edge::new("b", "a", Relationship::BuildsOn),
            Edge::new("c", "b", Relationship::BuildsOn),
            Edge::new("d", "c", Relationship::BuildsOn),
        ];
        GraphSession::new(GraphAssembler::default().assemble(decisions, edges, None, vec![]))
    }

    fn id(s: &str) -> DecisionId {
        DecisionId::new(s)
    }

    #[test]
    fn test_reachable_and_neighborhood() {
        let session = session().with_default_depth(1);
        let expected: HashSet<DecisionId> = [id("a"), id("b"), id("c")].into_iter().collect();
        assert_eq!(session.reachable(&id("b"), 1), expected);
        assert_eq!(session.neighborhood(&id("b")), expected);
    }

    #[test]
    fn test_search_navigation_resolves_nodes() {
        let mut session = session();
        assert_eq!(session.search("postgres"), 2);
        assert_eq!(session.current_match().unwrap().id, id("a"));
        assert_eq!(session.next_match().unwrap().id, id("b"));
        assert_eq!(session.next_match().unwrap().id, id("a"));
        assert_eq!(session.previous_match().unwrap().id, id("b"));

        session.clear_search();
        assert!(session.current_match().is_none());
        assert!(session.next_match().is_none());
    }

    #[test]
    fn test_apply_outcome_is_copy_on_write() {
        let mut session = session();
        let before = session.shared();

        let update = OutcomeUpdate::parse("c", "partial", None).unwrap();
        assert!(session.apply_outcome(&update));

        assert_eq!(session.node(&id("c")).unwrap().outcome, Some(Outcome::Partial));
        assert_eq!(before.node(&id("c")).unwrap().outcome, None);
    }

    #[test]
    fn test_apply_outcome_unknown_node() {
        let mut session = session();
        let shared = session.shared();
        let update = OutcomeUpdate::parse("zzz", "success", None).unwrap();

        assert!(!session.apply_outcome(&update));
        assert!(Arc::ptr_eq(&shared, &session.shared()));
    }

    #[test]
    fn test_highlight_through_session() {
        let session = session();
        let highlight = session.highlight(&id("d"), 1);
        assert!(highlight.contains(&id("c")));
        assert!(!highlight.contains(&id("b")));
        assert_eq!(highlight.edges(&session.payload().edges).count(), 1);
    }
}
