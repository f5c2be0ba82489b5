//! Pattern edits driven by pointer events.
//!
//! The reducer looks at the mode *before* the event is applied. A release
//! therefore still sees the press origin even though the next mode is
//! `Hover`.

use super::grid::{clip_to_pattern, snap_delta, snap_to_grid};
use super::lookup::find_at;
use super::mouse::{InteractionMode, PointerEvent};
use crate::score::{IdNote, NoteId, Pattern};
use serde::{Deserialize, Serialize};

/// Shortest length a resize can shrink a note to, in ticks.
pub const MIN_RESIZE_LENGTH: f64 = 1.0;

/// Editing defaults remembered between gestures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditDefaults {
    /// Quantization unit for new note starts and resize deltas.
    pub grid_size: f64,

    /// Length given to newly created notes. Follows the last deleted or
    /// resized note.
    pub note_size: f64,

    /// Counter for the next note id.
    pub next_id: u64,
}

impl Default for EditDefaults {
    fn default() -> Self {
        Self {
            grid_size: 1.0,
            note_size: 1.0,
            next_id: 0,
        }
    }
}

impl EditDefaults {
    /// Raises `next_id` past every id already used in `pattern`.
    ///
    /// Call this after loading a pattern from disk so new ids never collide
    /// with stored ones. Saturates at `u64::MAX`, which is never handed out.
    pub fn resume_after(&mut self, pattern: &Pattern) {
        if let Some(max) = pattern.max_id() {
            self.next_id = self.next_id.max(max.as_u64().saturating_add(1));
        }
    }

    /// Takes the next id from the counter, or None once the counter is
    /// exhausted.
    fn allocate_id(&mut self) -> Option<NoteId> {
        let next = self.next_id.checked_add(1)?;
        let id = NoteId::from_counter(self.next_id);
        self.next_id = next;
        Some(id)
    }
}

/// What a single pointer event did to the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The pattern was not touched.
    Unchanged,
    /// A click on empty space added a note.
    Created(NoteId),
    /// A click on empty space could not produce a note inside the pattern.
    Rejected,
    /// A click on a note removed it.
    Deleted(NoteId),
    /// A drag moved one edge of a note.
    Resized(NoteId),
}

impl EditOutcome {
    /// Whether the pattern was modified.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            EditOutcome::Created(_) | EditOutcome::Deleted(_) | EditOutcome::Resized(_)
        )
    }
}

/// Applies the edit implied by `event` arriving in `mode`.
///
/// Mutates `pattern` and `defaults` in place and reports what changed.
pub fn reduce(
    pattern: &mut Pattern,
    defaults: &mut EditDefaults,
    mode: &InteractionMode,
    event: &PointerEvent,
) -> EditOutcome {
    match (mode, event) {
        (InteractionMode::Down { origin, .. }, PointerEvent::Mouseup) => {
            if let Some(hit) = find_at(pattern.notes(), origin).copied() {
                pattern.remove(hit.id);
                // Remember the length so the "same" note can be placed elsewhere
                defaults.note_size = hit.note.length();
                return EditOutcome::Deleted(hit.id);
            }

            let candidate = snap_to_grid(defaults.grid_size, defaults.note_size, origin);
            let Some(note) = clip_to_pattern(candidate, pattern.length()) else {
                return EditOutcome::Rejected;
            };
            match defaults.allocate_id() {
                Some(id) => {
                    pattern.push(IdNote::new(id, note));
                    EditOutcome::Created(id)
                }
                None => EditOutcome::Rejected,
            }
        }

        (
            InteractionMode::ResizeNote {
                from_right,
                origin,
                current,
                note,
                note_index,
            },
            PointerEvent::Mousemove(_),
        ) => {
            let Some(current) = current else {
                return EditOutcome::Unchanged;
            };

            let old_length = note.length();
            let delta = snap_delta(defaults.grid_size, current.time - origin.time);

            let (resized, new_length) = if *from_right {
                let new_length = (old_length + delta).max(MIN_RESIZE_LENGTH);
                let end = pattern.length().min(note.start + new_length);
                (note.with_end(end), new_length)
            } else {
                let new_length = (old_length - delta).max(MIN_RESIZE_LENGTH);
                let start = (note.end - new_length).max(0.0);
                (note.with_start(start), new_length)
            };

            match pattern.replace_at(*note_index, resized) {
                Some(id) => {
                    defaults.note_size = new_length;
                    EditOutcome::Resized(id)
                }
                None => EditOutcome::Unchanged,
            }
        }

        _ => EditOutcome::Unchanged,
    }
}
