use crate::editor::EditDefaults;
use crate::score::Pattern;
use std::collections::VecDeque;

/// Maximum number of undo/redo states to keep.
const MAX_HISTORY_SIZE: usize = 32;

/// A snapshot of the editable state at a point in time.
///
/// The note-size default is part of the snapshot because deleting and
/// resizing notes changes it; undoing the edit should restore it too.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    /// The complete pattern.
    pub pattern: Pattern,

    /// Editing defaults at the time of the snapshot.
    pub defaults: EditDefaults,

    /// A brief description of what operation created this snapshot.
    /// Used for status messages when undoing/redoing.
    pub description: String,
}

impl StateSnapshot {
    /// Creates a new snapshot from the current state.
    pub fn new(pattern: &Pattern, defaults: &EditDefaults, description: impl Into<String>) -> Self {
        Self {
            pattern: pattern.clone(),
            defaults: *defaults,
            description: description.into(),
        }
    }

    /// Validates that the snapshot can be safely restored.
    pub fn is_valid(&self) -> bool {
        self.pattern.validate().is_ok()
    }

    /// Returns the defaults to restore.
    ///
    /// Only the note size comes from the snapshot. The grid is a view
    /// setting and stays as it is, and ids handed out after the snapshot stay
    /// burned: an older counter could hand out an id that still exists on the
    /// redo stack.
    pub fn defaults_for_restore(&self, current: &EditDefaults) -> EditDefaults {
        EditDefaults {
            note_size: self.defaults.note_size,
            next_id: self.defaults.next_id.max(current.next_id),
            ..*current
        }
    }
}

/// Undo/redo history of completed gestures.
///
/// Both sides hold at most `MAX_HISTORY_SIZE` snapshots, most recent at the
/// back. When a side is full the oldest gesture falls off the front.
/// Recording a new gesture discards everything on the redo side.
#[derive(Debug, Default)]
pub struct HistoryManager {
    /// Gestures that can be undone.
    undo_stack: VecDeque<StateSnapshot>,

    /// Gestures that were undone and can be re-applied.
    redo_stack: VecDeque<StateSnapshot>,
}

/// Appends to a bounded side of the history, dropping the oldest snapshot
/// when it is full.
fn push_bounded(stack: &mut VecDeque<StateSnapshot>, snapshot: StateSnapshot) {
    if stack.len() == MAX_HISTORY_SIZE {
        stack.pop_front();
    }
    stack.push_back(snapshot);
}

impl HistoryManager {
    /// Creates a new empty history manager.
    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(MAX_HISTORY_SIZE),
            redo_stack: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Records the pattern as it was before a completed gesture.
    ///
    /// Starting a new branch of edits drops every undone gesture.
    pub fn push_undo(&mut self, snapshot: StateSnapshot) {
        self.redo_stack.clear();
        self.push_undo_preserve_redo(snapshot);
    }

    /// Records a snapshot on the undo side without touching the redo side.
    ///
    /// Redo uses this: the state being left goes back on the undo side,
    /// but the remaining undone gestures must survive.
    pub fn push_undo_preserve_redo(&mut self, snapshot: StateSnapshot) {
        push_bounded(&mut self.undo_stack, snapshot);
    }

    /// Takes the most recent gesture to undo.
    ///
    /// The caller pushes the current state to redo before applying it.
    pub fn pop_undo(&mut self) -> Option<StateSnapshot> {
        self.undo_stack.pop_back()
    }

    /// Records the state an undo is leaving.
    pub fn push_redo(&mut self, snapshot: StateSnapshot) {
        push_bounded(&mut self.redo_stack, snapshot);
    }

    /// Takes the most recently undone gesture.
    pub fn pop_redo(&mut self) -> Option<StateSnapshot> {
        self.redo_stack.pop_back()
    }

    /// Forgets every gesture, e.g. after a snapshot failed to validate.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Whether any gesture can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether any undone gesture can be re-applied.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

/// Test-only helper methods for HistoryManager.
#[cfg(test)]
impl HistoryManager {
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}
