//! Pointer interaction modes and their transition function.
//!
//! The mode is transient UI state: it starts as `Hover` with no pointer when
//! the editor opens and is re-derived on every pointer event.

use super::geometry::{ticks_to_px, to_musical, MusicalPoint, ScreenPoint};
use super::lookup::find_index_at;
use crate::error::EditorError;
use crate::score::{IdNote, Note};

/// Horizontal pixel distance a press must travel before it becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// What the pointer is currently doing in the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionMode {
    /// No button held. `pointer` is None while the pointer is outside.
    Hover { pointer: Option<MusicalPoint> },

    /// Button held, not yet dragged far enough to resize anything.
    /// `current` is None while the pointer is outside the editor.
    Down {
        origin: MusicalPoint,
        current: Option<MusicalPoint>,
    },

    /// Dragging one edge of a note.
    ResizeNote {
        /// True when the right edge is being moved.
        from_right: bool,
        origin: MusicalPoint,
        current: Option<MusicalPoint>,
        /// The note as it was when the drag started.
        note: Note,
        /// Position of the note in the pattern when the drag started.
        note_index: usize,
    },
}

impl Default for InteractionMode {
    fn default() -> Self {
        InteractionMode::Hover { pointer: None }
    }
}

impl InteractionMode {
    /// Short lowercase name, used in logs and the status bar.
    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Hover { .. } => "hover",
            InteractionMode::Down { .. } => "down",
            InteractionMode::ResizeNote { .. } => "resize",
        }
    }

    /// The most recent pointer position inside the editor, if any.
    pub fn pointer(&self) -> Option<MusicalPoint> {
        match *self {
            InteractionMode::Hover { pointer } => pointer,
            InteractionMode::Down { current, .. } => current,
            InteractionMode::ResizeNote { current, .. } => current,
        }
    }

    /// Whether a button is currently held.
    pub fn is_pressed(&self) -> bool {
        !matches!(self, InteractionMode::Hover { .. })
    }
}

/// A pointer event with its position already interpreted musically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Mousemove(MusicalPoint),
    Mousedown(MusicalPoint),
    Mouseup,
    Mouseleave,
}

/// Kinds of raw pointer events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mousedown,
    Mousemove,
    Mouseup,
    Mouseleave,
}

/// A pointer event as the host sees it: a kind and a canvas-local point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerEvent {
    pub kind: PointerKind,
    pub point: ScreenPoint,
}

impl RawPointerEvent {
    pub fn new(kind: PointerKind, point: ScreenPoint) -> Self {
        Self { kind, point }
    }

    /// Interprets the event under the given scroll state.
    ///
    /// Release and leave events carry no position for the engine.
    pub fn to_musical(self, scroll_octave: i32) -> PointerEvent {
        match self.kind {
            PointerKind::Mousedown => PointerEvent::Mousedown(to_musical(self.point, scroll_octave)),
            PointerKind::Mousemove => PointerEvent::Mousemove(to_musical(self.point, scroll_octave)),
            PointerKind::Mouseup => PointerEvent::Mouseup,
            PointerKind::Mouseleave => PointerEvent::Mouseleave,
        }
    }
}

/// Computes the mode that follows `mode` after `event`.
///
/// `notes` is the pattern content before the event is applied; it is only
/// consulted when a press turns into a drag, to decide whether the drag
/// grabbed a note.
///
/// # Errors
///
/// Returns [`EditorError::PressWhileDragging`] for a press while a button is
/// already held.
pub fn transition(
    mode: &InteractionMode,
    event: &PointerEvent,
    notes: &[IdNote],
) -> Result<InteractionMode, EditorError> {
    let next = match (*mode, *event) {
        (InteractionMode::Hover { .. }, PointerEvent::Mousemove(p)) => {
            InteractionMode::Hover { pointer: Some(p) }
        }
        (InteractionMode::Hover { .. }, PointerEvent::Mousedown(p)) => InteractionMode::Down {
            origin: p,
            current: Some(p),
        },
        // A release whose press happened outside the editor
        (InteractionMode::Hover { .. }, PointerEvent::Mouseup) => *mode,
        (InteractionMode::Hover { .. }, PointerEvent::Mouseleave) => {
            InteractionMode::Hover { pointer: None }
        }

        (InteractionMode::Down { origin, .. }, PointerEvent::Mousemove(p)) => {
            start_drag(origin, p, notes).unwrap_or(InteractionMode::Down {
                origin,
                current: Some(p),
            })
        }
        (InteractionMode::Down { current, .. }, PointerEvent::Mouseup) => {
            InteractionMode::Hover { pointer: current }
        }
        (InteractionMode::Down { origin, .. }, PointerEvent::Mouseleave) => {
            InteractionMode::Down {
                origin,
                current: None,
            }
        }

        (resize @ InteractionMode::ResizeNote { .. }, PointerEvent::Mousemove(p)) => {
            with_current(resize, Some(p))
        }
        (InteractionMode::ResizeNote { current, .. }, PointerEvent::Mouseup) => {
            InteractionMode::Hover { pointer: current }
        }
        (resize @ InteractionMode::ResizeNote { .. }, PointerEvent::Mouseleave) => {
            with_current(resize, None)
        }

        (
            InteractionMode::Down { .. } | InteractionMode::ResizeNote { .. },
            PointerEvent::Mousedown(_),
        ) => {
            return Err(EditorError::PressWhileDragging { mode: mode.name() });
        }
    };

    Ok(next)
}

/// Turns a held press into a resize once it has moved past the threshold,
/// provided the press landed on a note.
fn start_drag(origin: MusicalPoint, now: MusicalPoint, notes: &[IdNote]) -> Option<InteractionMode> {
    if ticks_to_px((origin.time - now.time).abs()) <= DRAG_THRESHOLD_PX {
        return None;
    }

    let note_index = find_index_at(notes, &origin)?;
    let note = notes[note_index].note;
    Some(InteractionMode::ResizeNote {
        from_right: origin.time > note.midpoint(),
        origin,
        current: Some(now),
        note,
        note_index,
    })
}

fn with_current(mode: InteractionMode, pointer: Option<MusicalPoint>) -> InteractionMode {
    match mode {
        InteractionMode::ResizeNote {
            from_right,
            origin,
            note,
            note_index,
            ..
        } => InteractionMode::ResizeNote {
            from_right,
            origin,
            current: pointer,
            note,
            note_index,
        },
        other => other,
    }
}
