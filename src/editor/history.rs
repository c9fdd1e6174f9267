//! Undo/redo history over grid snapshots.

use std::collections::VecDeque;

use crate::grid::Snapshot;

pub const DEFAULT_UNDO_LIMIT: usize = 50;

/// Bounded undo stack plus redo stack.
///
/// The undo stack evicts its oldest entry once it holds `limit` snapshots.
/// The redo stack is only cleared by `record`.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(limit),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Save the pre-mutation state of a new command
    pub fn record(&mut self, before: Snapshot) {
        self.push_undo(before);
        self.redo.clear();
    }

    /// Pop the latest undo point, parking `current` on the redo stack
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Pop the latest redo point, making `current` undoable again
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Oldest retained undo point
    pub fn oldest(&self) -> Option<&Snapshot> {
        self.undo.front()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
