//! Undo/redo history of whole-document snapshots.
//!
//! DESIGN
//! ======
//! Each entry is a deep copy of the entire `Building`. Documents are small
//! (a few floors of a few hundred objects), so whole snapshots keep undo exact
//! across every kind of mutation, floor additions and deletions included. The
//! undo stack is bounded; the oldest snapshot is evicted first. Taking a new
//! snapshot clears the redo stack.
//!
//! A continuous transform (drag, scale, rotate) emits many events but must
//! produce exactly one snapshot. `GestureLatch` arms on the first event of a
//! gesture and disarms on the terminal "modified" event.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::UNDO_CAPACITY;
use crate::doc::Building;

/// Bounded undo/redo stacks, most recent last.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Building>,
    redo: Vec<Building>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(UNDO_CAPACITY)
    }
}

impl History {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { undo: VecDeque::new(), redo: Vec::new(), capacity: capacity.max(1) }
    }

    /// Record the state before a mutation.
    pub fn snapshot(&mut self, building: &Building) {
        self.undo.push_back(building.clone());
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Restore the previous state. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, building: &mut Building) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(std::mem::replace(building, previous));
        true
    }

    /// Re-apply an undone state. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, building: &mut Building) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push_back(std::mem::replace(building, next));
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Drop every snapshot, e.g. after loading a different document.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

/// One-shot latch ensuring a single snapshot per transform gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureLatch {
    armed: bool,
}

impl GestureLatch {
    /// Returns `true` only for the first event of a gesture.
    pub fn arm(&mut self) -> bool {
        !std::mem::replace(&mut self.armed, true)
    }

    /// End the current gesture.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
