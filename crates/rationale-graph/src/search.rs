//! Search Index
//!
//! Case-insensitive substring search across node text with a cyclic cursor.

use rationale_domain::{Decision, DecisionId};

/// Matches for the current query plus a cursor into them
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    query: String,
    matches: Vec<DecisionId>,
    cursor: usize,
}

impl SearchIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Match `query` against topic, decision and reasoning of `nodes`
    ///
    /// Matches keep input order and the cursor resets to the first one.
    /// An empty query clears the index. Returns the number of matches.
    pub fn search(&mut self, query: &str, nodes: &[Decision]) -> usize {
        if query.is_empty() {
            self.clear();
            return 0;
        }

        let needle = query.to_lowercase();
        self.query = query.to_string();
        self.matches = nodes
            .iter()
            .filter(|d| d.matches_lowercase(&needle))
            .map(|d| d.id.clone())
            .collect();
        self.cursor = 0;
        self.matches.len()
    }

    /// Drop all matches and reset the cursor
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.cursor = 0;
    }

    /// The active query, empty after a clear
    pub fn query(&self) -> &str {
        &self.query
    }

    /// All matches in order
    pub fn matches(&self) -> &[DecisionId] {
        &self.matches
    }

    /// Number of matches
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Check if there are no matches
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Match under the cursor
    pub fn current(&self) -> Option<&DecisionId> {
        self.matches.get(self.cursor)
    }

    /// Cursor position as `(index, total)`
    pub fn position(&self) -> Option<(usize, usize)> {
        (!self.matches.is_empty()).then(|| (self.cursor, self.matches.len()))
    }

    /// Advance the cursor, wrapping to the first match
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&DecisionId> {
        let n = self.matches.len();
        if n == 0 {
            return None;
        }
        self.cursor = (self.cursor + 1) % n;
        self.current()
    }

    /// Move the cursor back, wrapping to the last match
    pub fn previous(&mut self) -> Option<&DecisionId> {
        let n = self.matches.len();
        if n == 0 {
            return None;
        }
        self.cursor = (self.cursor + n - 1) % n;
        self.current()
    }
}
