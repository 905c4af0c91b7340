//! Snapshot-based undo/redo history.

use crate::surface::{Snapshot, Surface};
use std::collections::VecDeque;

/// Default maximum number of undo states to keep.
pub const DEFAULT_CAPACITY: usize = 25;

/// Linear undo/redo over full-bitmap snapshots.
///
/// The top of the undo stack always mirrors the surface. The bottom entry is
/// the floor: undo never pops it. Capacity counts undoable edits, so the undo
/// stack holds at most `capacity + 1` entries including the floor. Pushing a
/// new snapshot discards the redo stack, and once more than `capacity` edits
/// are stacked the oldest entry is dropped for good.
#[derive(Debug, Clone)]
pub struct History {
    /// Undo history stack (oldest first).
    undo_stack: VecDeque<Snapshot>,
    /// Redo history stack (most recently undone last).
    redo_stack: Vec<Snapshot>,
    /// Maximum number of undoable edits.
    capacity: usize,
}

impl History {
    /// Create a history whose floor entry is the current state of `surface`.
    pub fn new(surface: &Surface, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut undo_stack = VecDeque::with_capacity(capacity + 2);
        undo_stack.push_back(surface.snapshot());
        Self {
            undo_stack,
            redo_stack: Vec::new(),
            capacity,
        }
    }

    /// Record the current surface as a completed edit.
    pub fn push_snapshot(&mut self, surface: &Surface) {
        self.undo_stack.push_back(surface.snapshot());
        self.evict_overflow();

        // Clear redo stack when new changes are made
        self.redo_stack.clear();
    }

    /// Undo the last edit.
    /// Returns true if undo was performed, false if only the floor is left.
    pub fn undo(&mut self, surface: &mut Surface) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.redo_stack.extend(self.undo_stack.pop_back());
        if let Some(top) = self.undo_stack.back() {
            surface.restore(top);
        }
        true
    }

    /// Redo the last undone edit.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, surface: &mut Surface) -> bool {
        let Some(redone) = self.redo_stack.pop() else {
            return false;
        };
        surface.restore(&redone);
        self.undo_stack.push_back(redone);
        self.evict_overflow();
        true
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of entries on the undo stack, floor included.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of entries on the redo stack.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Maximum number of undoable edits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The snapshot the surface currently mirrors.
    pub fn current(&self) -> Option<&Snapshot> {
        self.undo_stack.back()
    }

    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &Snapshot> {
        self.undo_stack.iter()
    }

    fn evict_overflow(&mut self) {
        while self.undo_stack.len() > self.capacity + 1 {
            self.undo_stack.pop_front();
            log::debug!("History full, evicted oldest snapshot");
        }
    }
}
