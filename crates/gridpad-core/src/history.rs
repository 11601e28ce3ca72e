//! Undo/redo history of whole-grid snapshots.
//!
//! Snapshots are independent values; restoring one never aliases the live grid. The undo
//! stack is bounded by `limit` (oldest entries are dropped first). An unbounded history
//! (`limit = None`) grows with every edit and is only advisable for short sessions.
//!
//! [`History`] stores bare [`Grid`]s by default. The document stores a [`Snapshot`], which
//! also records how the edit moved columns so the view settings can follow an undo.

use std::collections::VecDeque;

use gridpad_engine::Grid;
use gridpad_engine::engine::{ColumnSettings, ViewState};
use tracing::debug;

/// Maximum number of undo entries to keep
pub const MAX_UNDO_STACK: usize = 100;

/// How an edit changed the column layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ColumnEdit {
    #[default]
    None,
    /// A blank column was inserted at this canonical index.
    Inserted(usize),
    /// The column at `at` was removed while carrying `settings`.
    Deleted { at: usize, settings: ColumnSettings },
    /// The whole grid was swapped; holds the view state that goes with the snapshot.
    Replaced(ViewState),
}

/// A grid paired with the column edit that separates it from its neighbour on the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Grid,
    pub columns: ColumnEdit,
}

#[derive(Clone, Debug)]
pub struct History<S = Grid> {
    /// Oldest first.
    undo: VecDeque<S>,
    /// Top is the most recently undone entry.
    redo: Vec<S>,
    limit: Option<usize>,
}

impl<S> Default for History<S> {
    fn default() -> Self {
        History::with_limit(Some(MAX_UNDO_STACK))
    }
}

impl<S> History<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` keeps every snapshot. `Some(0)` is treated as unbounded as well.
    pub fn with_limit(limit: Option<usize>) -> Self {
        History {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.filter(|&n| n > 0),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record the state as it was before a mutation. Any redo entries are discarded.
    pub fn commit(&mut self, snapshot: S) {
        self.push_undo(snapshot);
        self.redo.clear();
    }

    /// Take the newest snapshot, parking `current` for redo. Returns `(current, false)`
    /// when there is nothing to undo.
    pub fn undo(&mut self, current: S) -> (S, bool) {
        match self.undo.pop_back() {
            Some(previous) => {
                self.redo.push(current);
                debug!(undo = self.undo.len(), redo = self.redo.len(), "undo");
                (previous, true)
            }
            None => (current, false),
        }
    }

    /// Take the most recently undone snapshot, parking `current` for undo.
    pub fn redo(&mut self, current: S) -> (S, bool) {
        match self.redo.pop() {
            Some(next) => {
                self.push_undo(current);
                debug!(undo = self.undo.len(), redo = self.redo.len(), "redo");
                (next, true)
            }
            None => (current, false),
        }
    }

    /// The entry the next [`undo`](Self::undo) would return.
    pub fn peek_undo(&self) -> Option<&S> {
        self.undo.back()
    }

    /// The entry the next [`redo`](Self::redo) would return.
    pub fn peek_redo(&self) -> Option<&S> {
        self.redo.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, snapshot: S) {
        self.undo.push_back(snapshot);
        if let Some(limit) = self.limit {
            while self.undo.len() > limit {
                self.undo.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid_with(value: &str) -> Grid {
        let mut grid = Grid::new(1, 1);
        grid.set_cell_value(0, 0, value).unwrap();
        grid
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut history: History = History::new();
        let (grid, changed) = history.undo(grid_with("x"));
        assert!(!changed);
        assert_eq!(grid, grid_with("x"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_then_redo_restores_exact_grid() {
        let mut history: History = History::new();
        let before = grid_with("before");
        history.commit(before.clone());
        let current = grid_with("after");

        let (restored, changed) = history.undo(current.clone());
        assert!(changed);
        assert_eq!(restored, before);
        assert!(history.can_redo());

        let (again, changed) = history.redo(restored);
        assert!(changed);
        assert_eq!(again, current);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut history: History = History::new();
        history.commit(grid_with("a"));
        let _ = history.undo(grid_with("b"));
        assert!(history.can_redo());
        history.commit(grid_with("c"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_redo_is_lifo() {
        let mut history: History = History::new();
        history.commit(grid_with("1"));
        history.commit(grid_with("2"));
        let (g, _) = history.undo(grid_with("3"));
        let (g, _) = history.undo(g);
        assert_eq!(g, grid_with("1"));
        let (g, _) = history.redo(g);
        assert_eq!(g, grid_with("2"));
        let (g, _) = history.redo(g);
        assert_eq!(g, grid_with("3"));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history: History = History::with_limit(Some(2));
        for v in ["a", "b", "c"] {
            history.commit(grid_with(v));
        }
        assert_eq!(history.undo_len(), 2);
        let (g, _) = history.undo(grid_with("d"));
        let (g, _) = history.undo(g);
        assert_eq!(g, grid_with("b"));
        let (_, changed) = history.undo(g);
        assert!(!changed);
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let mut history: History = History::with_limit(Some(0));
        assert_eq!(history.limit(), None);
        for i in 0..150 {
            history.commit(grid_with(&i.to_string()));
        }
        assert_eq!(history.undo_len(), 150);
    }

    #[test]
    fn test_peek_matches_next_entry() {
        let mut history: History = History::new();
        assert_eq!(history.peek_undo(), None);
        history.commit(grid_with("a"));
        assert_eq!(history.peek_undo(), Some(&grid_with("a")));
        let _ = history.undo(grid_with("b"));
        assert_eq!(history.peek_undo(), None);
        assert_eq!(history.peek_redo(), Some(&grid_with("b")));
    }

    #[test]
    fn test_default_limit() {
        let mut history: History = History::default();
        for i in 0..(MAX_UNDO_STACK + 5) {
            history.commit(grid_with(&i.to_string()));
        }
        assert_eq!(history.undo_len(), MAX_UNDO_STACK);
        history.clear();
        assert!(!history.can_undo());
    }
}
