//! The editor object a host drives with pointer events.
//!
//! `RollEditor` owns the transient interaction state and the editing
//! defaults; the pattern stays with the host and is passed in for each event.

use super::geometry::{self, Camera, MusicalPoint};
use super::grid::{clip_to_pattern, snap_to_grid};
use super::lookup::find_at;
use super::mouse::{transition, InteractionMode, PointerEvent, RawPointerEvent};
use super::reduce::{reduce, EditDefaults, EditOutcome};
use crate::error::EditorError;
use crate::score::{Note, Pattern};

/// Interactive note editor for one pattern view.
#[derive(Debug, Clone)]
pub struct RollEditor {
    mode: InteractionMode,
    defaults: EditDefaults,
    scroll_octave: i32,
}

impl RollEditor {
    /// Creates an editor in `Hover` mode with no pointer.
    pub fn new(defaults: EditDefaults, scroll_octave: i32) -> Self {
        Self {
            mode: InteractionMode::default(),
            defaults,
            scroll_octave,
        }
    }

    /// Current interaction mode, for cursor and highlight rendering.
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Current editing defaults.
    pub fn defaults(&self) -> &EditDefaults {
        &self.defaults
    }

    /// Replaces the editing defaults, e.g. when restoring history.
    pub fn set_defaults(&mut self, defaults: EditDefaults) {
        self.defaults = defaults;
    }

    /// Changes the grid used for new notes and resize steps.
    ///
    /// Non-positive or non-finite sizes are ignored.
    pub fn set_grid_size(&mut self, grid_size: f64) {
        if grid_size.is_finite() && grid_size > 0.0 {
            self.defaults.grid_size = grid_size;
        } else {
            tracing::warn!(grid_size, "ignoring invalid grid size");
        }
    }

    pub fn scroll_octave(&self) -> i32 {
        self.scroll_octave
    }

    /// Changes the vertical scroll. Points already stored in the mode keep
    /// the interpretation they had when they were captured.
    pub fn set_scroll_octave(&mut self, scroll_octave: i32) {
        self.scroll_octave = scroll_octave;
    }

    /// Camera for the current scroll position.
    pub fn camera(&self) -> Camera {
        geometry::camera(self.scroll_octave)
    }

    /// Whether a note edge is being dragged (the host shows a resize cursor).
    pub fn is_resizing(&self) -> bool {
        matches!(self.mode, InteractionMode::ResizeNote { .. })
    }

    /// Drops any gesture in progress and returns to `Hover` with no pointer.
    ///
    /// The pattern is left as it is: a partially dragged resize keeps its
    /// last applied length.
    pub fn reset_mode(&mut self) {
        self.mode = InteractionMode::default();
    }

    /// Interprets a raw pointer event under the current scroll state and
    /// applies it to `pattern`.
    pub fn dispatch(
        &mut self,
        pattern: &mut Pattern,
        event: RawPointerEvent,
    ) -> Result<EditOutcome, EditorError> {
        let event = event.to_musical(self.scroll_octave);
        self.apply(pattern, event)
    }

    /// Applies one pointer event.
    ///
    /// The next mode and the edit are both derived from the mode in effect
    /// before the event, then committed together.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PressWhileDragging`] if a press arrives while a
    /// button is already held. Nothing is modified in that case.
    pub fn apply(
        &mut self,
        pattern: &mut Pattern,
        event: PointerEvent,
    ) -> Result<EditOutcome, EditorError> {
        let next_mode = transition(&self.mode, &event, pattern.notes())?;
        let outcome = reduce(pattern, &mut self.defaults, &self.mode, &event);

        if self.mode.name() != next_mode.name() {
            tracing::trace!(from = self.mode.name(), to = next_mode.name(), "mode change");
        }
        match outcome {
            EditOutcome::Created(id) => {
                tracing::debug!(%id, next_id = self.defaults.next_id, "note created")
            }
            EditOutcome::Deleted(id) => {
                tracing::debug!(%id, note_size = self.defaults.note_size, "note deleted")
            }
            EditOutcome::Resized(id) => {
                tracing::trace!(%id, note_size = self.defaults.note_size, "note resized")
            }
            EditOutcome::Rejected => tracing::debug!("click outside pattern bounds"),
            EditOutcome::Unchanged => {}
        }

        self.mode = next_mode;
        Ok(outcome)
    }

    /// The note a click at the hover position would create, if the pointer is
    /// hovering over empty space inside the pattern.
    pub fn preview_note(&self, pattern: &Pattern) -> Option<Note> {
        let InteractionMode::Hover {
            pointer: Some(pointer),
        } = self.mode
        else {
            return None;
        };
        self.note_for_click(pattern, &pointer)
    }

    fn note_for_click(&self, pattern: &Pattern, mp: &MusicalPoint) -> Option<Note> {
        if find_at(pattern.notes(), mp).is_some() {
            return None;
        }
        let candidate = snap_to_grid(self.defaults.grid_size, self.defaults.note_size, mp);
        clip_to_pattern(candidate, pattern.length())
    }
}

impl Default for RollEditor {
    fn default() -> Self {
        Self::new(EditDefaults::default(), 3)
    }
}
