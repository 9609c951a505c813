use std::collections::VecDeque;

use flowdraw_model::Graph;
use tracing::debug;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Bounded undo log of full graph snapshots.
///
/// The log always holds at least one entry and `cursor` always indexes into
/// it. Capturing after an undo discards the redo tail.
#[derive(Debug, Clone)]
pub struct History {
    log: VecDeque<Graph>,
    cursor: usize,
    capacity: usize,
    suppress_next: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self::with_initial(Graph::new(), capacity)
    }

    pub fn with_initial(initial: Graph, capacity: usize) -> Self {
        let mut log = VecDeque::new();
        log.push_back(initial);
        Self {
            log,
            cursor: 0,
            capacity: capacity.max(1),
            suppress_next: false,
        }
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current(&self) -> Option<&Graph> {
        self.log.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.log.len()
    }

    /// Makes the next [`History::capture`] a no-op.
    pub fn suppress_next_capture(&mut self) {
        self.suppress_next = true;
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppress_next
    }

    pub fn capture(&mut self, state: &Graph) -> bool {
        if std::mem::take(&mut self.suppress_next) {
            return false;
        }
        if self.current() == Some(state) {
            return false;
        }

        self.log.truncate(self.cursor + 1);
        self.log.push_back(state.clone());
        self.cursor = self.log.len() - 1;
        if self.log.len() > self.capacity {
            self.log.pop_front();
            self.cursor -= 1;
        }
        debug!(cursor = self.cursor, len = self.log.len(), "captured snapshot");
        true
    }

    /// Steps back and returns the snapshot to apply. The capture that follows
    /// applying it is suppressed.
    pub fn undo(&mut self) -> Option<Graph> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.suppress_next = true;
        debug!(cursor = self.cursor, "undo");
        self.log.get(self.cursor).cloned()
    }

    pub fn redo(&mut self) -> Option<Graph> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.suppress_next = true;
        debug!(cursor = self.cursor, "redo");
        self.log.get(self.cursor).cloned()
    }
}
