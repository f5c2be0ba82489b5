//! Application state and event handling.
//!
//! This module hosts the piano roll engine in a terminal: it owns the
//! pattern, turns terminal cells into canvas pixels, keeps undo history per
//! gesture, and handles saving.

use crate::config::{EditorConfig, MAX_SCROLL_OCTAVE, MIN_SCROLL_OCTAVE};
use crate::editor::{EditOutcome, PointerKind, RawPointerEvent, RollEditor, ScreenPoint};
use crate::error::{EditorError, StoreError};
use crate::history::{HistoryManager, StateSnapshot};
use crate::score::Pattern;
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Canvas pixels covered by one terminal column.
pub const PX_PER_COL: f64 = 6.0;

/// Canvas pixels covered by one terminal row. One row per pitch.
pub const PX_PER_ROW: f64 = 16.0;

/// Height of the time ruler at the top of the piano roll (in rows).
pub const TIME_RULER_HEIGHT: u16 = 1;

/// File used when saving a pattern that was not loaded from disk.
pub const DEFAULT_PATTERN_PATH: &str = "pattern.json";

/// How long status messages stay visible.
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Canvas pixel at the center of a cell, relative to the canvas corner.
pub fn cell_center(col: u16, row: u16) -> ScreenPoint {
    ScreenPoint::new(
        f64::from(col) * PX_PER_COL + PX_PER_COL / 2.0,
        f64::from(row) * PX_PER_ROW + PX_PER_ROW / 2.0,
    )
}

/// Layout regions for mouse hit testing.
/// Stores the screen coordinates of the canvas from the last render.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegions {
    /// The canvas area of the piano roll: keyboard strip plus note grid.
    pub roll_grid: Rect,
}

impl LayoutRegions {
    /// Checks if a point is within a rectangle.
    fn contains(rect: Rect, x: u16, y: u16) -> bool {
        x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
    }

    /// Checks if a point is within the piano roll canvas.
    pub fn is_in_roll_grid(&self, x: u16, y: u16) -> bool {
        Self::contains(self.roll_grid, x, y)
    }

    /// Converts a terminal cell inside the canvas to the canvas pixel at the
    /// cell's center.
    pub fn canvas_point(&self, x: u16, y: u16) -> Option<ScreenPoint> {
        if !self.is_in_roll_grid(x, y) {
            return None;
        }
        Some(cell_center(x - self.roll_grid.x, y - self.roll_grid.y))
    }
}

/// Main application state.
pub struct App {
    /// The pattern being edited.
    pattern: Pattern,

    /// Interaction engine.
    pub editor: RollEditor,

    /// Settings the session was started with.
    pub config: EditorConfig,

    /// Undo/redo history of completed gestures.
    history: HistoryManager,

    /// State captured when the current gesture started.
    gesture_start: Option<StateSnapshot>,

    /// Last edit made by the current gesture.
    gesture_edit: Option<EditOutcome>,

    /// Whether the last pointer position was inside the canvas.
    pointer_inside: bool,

    /// Screen regions from the last render.
    pub layout: LayoutRegions,

    /// Where the pattern is saved.
    pub pattern_path: Option<PathBuf>,

    /// Whether the pattern changed since it was loaded or saved.
    modified: bool,

    /// Transient message for the status bar.
    pub status_message: Option<(String, Instant)>,

    /// Whether the key hint line is visible.
    pub show_help: bool,
}

impl App {
    /// Creates the application around an existing pattern.
    ///
    /// The id counter is raised past every id already present in `pattern`.
    pub fn new(config: EditorConfig, pattern: Pattern, pattern_path: Option<PathBuf>) -> Self {
        let mut defaults = config.edit_defaults();
        defaults.resume_after(&pattern);
        let editor = RollEditor::new(defaults, config.scroll_octave);

        Self {
            pattern,
            editor,
            config,
            history: HistoryManager::new(),
            gesture_start: None,
            gesture_edit: None,
            pointer_inside: false,
            layout: LayoutRegions::default(),
            pattern_path,
            modified: false,
            status_message: None,
            show_help: false,
        }
    }

    /// Returns the pattern being edited.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Whether the pattern has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Sets a status message to display.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Clears expired status messages.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
            }
        }
    }

    /// Handles a left button press at a terminal cell.
    ///
    /// Presses outside the canvas are ignored, like a browser canvas never
    /// sees them.
    pub fn handle_mouse_down(&mut self, x: u16, y: u16) {
        let Some(point) = self.layout.canvas_point(x, y) else {
            return;
        };
        self.pointer_inside = true;

        let event = RawPointerEvent::new(PointerKind::Mousedown, point);
        if let Err(e) = self.dispatch(event) {
            // Terminals drop the release when the button comes up outside the
            // window; start over from the new press.
            tracing::warn!(error = %e, "recovering from missing mouse release");
            self.finish_gesture();
            self.editor.reset_mode();
            if let Err(e) = self.dispatch(event) {
                tracing::error!(error = %e, "mouse press rejected after reset");
                return;
            }
        }

        self.gesture_start = Some(StateSnapshot::new(
            &self.pattern,
            self.editor.defaults(),
            "Edit",
        ));
        self.gesture_edit = None;
    }

    /// Handles pointer motion, with or without a button held.
    ///
    /// Leaving the canvas is reported to the engine once.
    pub fn handle_mouse_move(&mut self, x: u16, y: u16) {
        match self.layout.canvas_point(x, y) {
            Some(point) => {
                self.pointer_inside = true;
                self.dispatch_logged(RawPointerEvent::new(PointerKind::Mousemove, point));
            }
            None if self.pointer_inside => {
                self.pointer_inside = false;
                self.dispatch_logged(RawPointerEvent::new(
                    PointerKind::Mouseleave,
                    ScreenPoint::default(),
                ));
            }
            None => {}
        }
    }

    /// Handles a left button release anywhere on screen.
    pub fn handle_mouse_up(&mut self, x: u16, y: u16) {
        let point = self.layout.canvas_point(x, y).unwrap_or_default();
        self.dispatch_logged(RawPointerEvent::new(PointerKind::Mouseup, point));
        self.finish_gesture();
    }

    fn dispatch(&mut self, event: RawPointerEvent) -> Result<EditOutcome, EditorError> {
        let outcome = self.editor.dispatch(&mut self.pattern, event)?;
        if outcome.is_edit() {
            self.gesture_edit = Some(outcome);
        }
        Ok(outcome)
    }

    fn dispatch_logged(&mut self, event: RawPointerEvent) {
        if let Err(e) = self.dispatch(event) {
            tracing::error!(error = %e, ?event, "pointer event rejected");
        }
    }

    /// Commits the gesture that just ended to the undo history if it changed
    /// the pattern.
    fn finish_gesture(&mut self) {
        let Some(mut snapshot) = self.gesture_start.take() else {
            return;
        };
        let edit = self.gesture_edit.take();
        if snapshot.pattern == self.pattern {
            return;
        }

        let description = match edit {
            Some(EditOutcome::Created(id)) => format!("Create note {id}"),
            Some(EditOutcome::Deleted(id)) => format!("Delete note {id}"),
            Some(EditOutcome::Resized(id)) => format!("Resize note {id}"),
            _ => "Edit".to_string(),
        };
        snapshot.description = description;
        self.history.push_undo(snapshot);
        self.modified = true;
    }

    /// Scrolls the pitch window by whole octaves.
    ///
    /// Positive values move toward lower pitches.
    pub fn scroll_octaves(&mut self, delta: i32) {
        let octave = (self.editor.scroll_octave() + delta).clamp(MIN_SCROLL_OCTAVE, MAX_SCROLL_OCTAVE);
        self.editor.set_scroll_octave(octave);
    }

    /// Switches to the next configured grid size.
    pub fn cycle_grid(&mut self) {
        if let Some(grid) = self.config.next_grid_size(self.editor.defaults().grid_size) {
            self.editor.set_grid_size(grid);
            self.set_status(format!("Grid: {} ticks", grid));
        }
    }

    /// Undoes the last completed gesture.
    ///
    /// Ignored while a button is held.
    ///
    /// # Returns
    ///
    /// true if undo was successful, false if nothing to undo or state was invalid
    pub fn undo(&mut self) -> bool {
        if self.editor.mode().is_pressed() {
            return false;
        }
        if !self.history.can_undo() {
            self.set_status("Nothing to undo");
            return false;
        }
        let Some(prev_state) = self.history.pop_undo() else {
            return false;
        };
        if !prev_state.is_valid() {
            self.history.clear();
            self.set_status("Undo failed: history cleared due to invalid state");
            return false;
        }

        let current = StateSnapshot::new(
            &self.pattern,
            self.editor.defaults(),
            prev_state.description.clone(),
        );
        self.history.push_redo(current);
        self.restore(prev_state, "Undo");
        true
    }

    /// Re-applies the last undone gesture.
    ///
    /// # Returns
    ///
    /// true if redo was successful, false if nothing to redo or state was invalid
    pub fn redo(&mut self) -> bool {
        if self.editor.mode().is_pressed() {
            return false;
        }
        if !self.history.can_redo() {
            self.set_status("Nothing to redo");
            return false;
        }
        let Some(next_state) = self.history.pop_redo() else {
            return false;
        };
        if !next_state.is_valid() {
            self.history.clear();
            self.set_status("Redo failed: history cleared due to invalid state");
            return false;
        }

        // Keep the remaining redo states so several redos can follow
        let current = StateSnapshot::new(
            &self.pattern,
            self.editor.defaults(),
            next_state.description.clone(),
        );
        self.history.push_undo_preserve_redo(current);
        self.restore(next_state, "Redo");
        true
    }

    fn restore(&mut self, snapshot: StateSnapshot, verb: &str) {
        let defaults = snapshot.defaults_for_restore(self.editor.defaults());
        self.editor.set_defaults(defaults);
        self.pattern = snapshot.pattern;
        self.modified = true;
        self.set_status(format!("{}: {}", verb, snapshot.description));
    }

    /// Saves the pattern to its path (or the default path).
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn save(&mut self) -> Result<PathBuf, StoreError> {
        let path = self
            .pattern_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATTERN_PATH));
        self.pattern.save_to_file(&path)?;
        tracing::info!(path = %path.display(), notes = self.pattern.note_count(), "pattern saved");

        self.pattern_path = Some(path.clone());
        self.modified = false;
        Ok(path)
    }

    /// Saves and reports the result in the status bar.
    pub fn save_with_status(&mut self) {
        match self.save() {
            Ok(path) => self.set_status(format!("Saved {}", path.display())),
            Err(e) => {
                tracing::error!("Save failed: {}", e);
                self.set_status(format!("Save failed: {}", e));
            }
        }
    }

    /// Saves unsaved changes before exit when the pattern has a known path.
    pub fn save_on_exit(&mut self) -> Result<(), StoreError> {
        if self.modified && self.pattern_path.is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::geometry::{pitch_origin, CONTENT_ORIGIN_X, PIXELS_PER_TICK};

    /// App with a 60x40 canvas at the screen origin.
    fn app() -> App {
        let config = EditorConfig {
            note_size: 4.0,
            ..EditorConfig::default()
        };
        let mut app = App::new(config, Pattern::new(16.0).unwrap(), None);
        app.layout.roll_grid = Rect::new(0, 0, 60, 40);
        app
    }

    /// Terminal cell whose center maps to `pitch` and lands inside tick
    /// `tick` (ticks are two columns wide).
    fn cell(app: &App, pitch: i32, tick: u16) -> (u16, u16) {
        let origin_col = (CONTENT_ORIGIN_X / PX_PER_COL).ceil() as u16;
        let per_tick = (PIXELS_PER_TICK / PX_PER_COL) as u16;
        let row = (pitch_origin(app.editor.scroll_octave()) - pitch) as u16;
        (origin_col + tick * per_tick, row)
    }

    fn click(app: &mut App, (x, y): (u16, u16)) {
        app.handle_mouse_down(x, y);
        app.handle_mouse_up(x, y);
    }

    #[test]
    fn test_canvas_point_is_cell_center() {
        let app = app();
        assert_eq!(app.layout.canvas_point(0, 0), Some(ScreenPoint::new(3.0, 8.0)));
        assert_eq!(app.layout.canvas_point(2, 1), Some(ScreenPoint::new(15.0, 24.0)));
        assert_eq!(app.layout.canvas_point(60, 0), None);
    }

    #[test]
    fn test_click_creates_note_at_cell() {
        let mut app = app();
        let c = cell(&app, 70, 2);
        click(&mut app, c);

        let notes = app.pattern().notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].note.pitch, 70);
        assert_eq!(notes[0].note.start, 2.0);
        assert_eq!(notes[0].note.end, 6.0);
        assert!(app.is_modified());
    }

    #[test]
    fn test_click_on_keyboard_does_nothing() {
        let mut app = app();
        click(&mut app, (1, 3));
        assert!(app.pattern().is_empty());
        assert!(!app.is_modified());
    }

    #[test]
    fn test_undo_redo_gesture() {
        let mut app = app();
        let c = cell(&app, 70, 2);
        click(&mut app, c);
        click(&mut app, c);
        assert!(app.pattern().is_empty());

        assert!(app.undo());
        assert_eq!(app.pattern().note_count(), 1);
        assert!(app.undo());
        assert!(app.pattern().is_empty());
        assert!(!app.undo());

        assert!(app.redo());
        assert!(app.redo());
        assert!(app.pattern().is_empty());

        // New notes keep getting fresh ids after undo
        assert!(app.undo());
        let other = cell(&app, 68, 0);
        click(&mut app, other);
        let ids: Vec<String> = app.pattern().notes().iter().map(|n| n.id.to_string()).collect();
        assert_eq!(ids, vec!["n0", "n1"]);
    }

    #[test]
    fn test_empty_history_reports_status() {
        let mut app = app();
        assert!(!app.undo());
        assert_eq!(
            app.status_message.as_ref().map(|(m, _)| m.as_str()),
            Some("Nothing to undo")
        );
        assert!(!app.redo());
        assert_eq!(
            app.status_message.as_ref().map(|(m, _)| m.as_str()),
            Some("Nothing to redo")
        );
        assert!(!app.is_modified());
    }

    #[test]
    fn test_missing_release_recovers() {
        let mut app = app();
        let c = cell(&app, 70, 2);
        app.handle_mouse_down(c.0, c.1);
        // Release lost; the next press restarts the gesture
        let other = cell(&app, 66, 0);
        app.handle_mouse_down(other.0, other.1);
        app.handle_mouse_up(other.0, other.1);

        assert_eq!(app.pattern().note_count(), 1);
        assert_eq!(app.pattern().notes()[0].note.pitch, 66);
    }

    #[test]
    fn test_leaving_canvas_sends_leave_once() {
        let mut app = app();
        let c = cell(&app, 70, 2);
        app.handle_mouse_move(c.0, c.1);
        assert!(app.editor.mode().pointer().is_some());

        app.handle_mouse_move(70, 50);
        assert!(app.editor.mode().pointer().is_none());
        app.handle_mouse_move(71, 50);
        assert!(app.editor.mode().pointer().is_none());
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = app();
        app.scroll_octaves(-10);
        assert_eq!(app.editor.scroll_octave(), MIN_SCROLL_OCTAVE);
        app.scroll_octaves(100);
        assert_eq!(app.editor.scroll_octave(), MAX_SCROLL_OCTAVE);
    }

    #[test]
    fn test_cycle_grid() {
        let mut app = app();
        app.cycle_grid();
        assert_eq!(app.editor.defaults().grid_size, 2.0);
        app.cycle_grid();
        app.cycle_grid();
        assert_eq!(app.editor.defaults().grid_size, 0.25);
    }
}
