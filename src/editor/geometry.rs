//! Mapping between canvas pixels and musical coordinates.
//!
//! The canvas is laid out as a piano keyboard on the left, a thin gutter,
//! then the note grid. Pitch rows run top to bottom from the highest visible
//! pitch; time runs left to right. Only the vertical position depends on the
//! scroll state.

use crate::score::Note;
use serde::{Deserialize, Serialize};

/// Canvas pixels per "fat pixel" of the roll artwork.
pub const SCALE: f64 = 2.0;

/// Height of one pitch row, in fat pixels.
pub const PITCH_HEIGHT: f64 = 8.0;

/// Height of one pitch row, in canvas pixels.
pub const ROW_HEIGHT_PX: f64 = SCALE * PITCH_HEIGHT;

/// Width of the keyboard strip, in canvas pixels.
pub const PIANO_WIDTH: f64 = 58.0 * SCALE;

/// Width of the gutter between keyboard and grid, in canvas pixels.
pub const GUTTER_WIDTH: f64 = 8.0 * SCALE;

/// Canvas x coordinate of tick 0.
pub const CONTENT_ORIGIN_X: f64 = PIANO_WIDTH + GUTTER_WIDTH + SCALE;

/// Horizontal canvas pixels per tick.
pub const PIXELS_PER_TICK: f64 = 6.0 * SCALE;

/// Border added to note rectangles so adjacent notes keep a visible edge.
pub const STROKE_PX: f64 = SCALE;

/// A point in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A screen point together with its musical interpretation.
///
/// Only [`to_musical`] produces these, so `pitch` and `time` always agree
/// with `x` and `y` for the scroll state in effect when it was built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MusicalPoint {
    pub x: f64,
    pub y: f64,
    /// Pitch row under the point.
    pub pitch: i32,
    /// Tick under the point. Negative over the keyboard strip.
    pub time: f64,
}

/// Pixel position of musical coordinate (pitch 0, tick 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
}

/// An axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[cfg(test)]
impl ScreenRect {
    /// Returns the center point of the rectangle.
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Pitch drawn in the top row for a given scroll octave.
///
/// Octave 0 shows the highest window; each step down shifts the view by
/// twelve rows.
pub fn pitch_origin(scroll_octave: i32) -> i32 {
    12 * (9 - scroll_octave) - 1
}

/// Interprets a canvas point musically under the given scroll state.
pub fn to_musical(point: ScreenPoint, scroll_octave: i32) -> MusicalPoint {
    let row = (point.y / ROW_HEIGHT_PX).floor() as i32;
    MusicalPoint {
        x: point.x,
        y: point.y,
        pitch: pitch_origin(scroll_octave) - row,
        time: (point.x - CONTENT_ORIGIN_X) / PIXELS_PER_TICK,
    }
}

/// Camera for a scroll octave.
pub fn camera(scroll_octave: i32) -> Camera {
    Camera {
        x: CONTENT_ORIGIN_X,
        y: f64::from(pitch_origin(scroll_octave)) * ROW_HEIGHT_PX,
    }
}

/// Rectangle a note occupies on the canvas, stroke included.
pub fn to_screen_rect(note: &Note, camera: Camera) -> ScreenRect {
    ScreenRect {
        x: camera.x + note.start * PIXELS_PER_TICK,
        y: camera.y - f64::from(note.pitch) * ROW_HEIGHT_PX,
        w: note.length() * PIXELS_PER_TICK + STROKE_PX,
        h: ROW_HEIGHT_PX + STROKE_PX,
    }
}

/// Horizontal pixel distance covered by a tick delta.
pub fn ticks_to_px(ticks: f64) -> f64 {
    ticks * PIXELS_PER_TICK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_origin() {
        assert_eq!(pitch_origin(0), 107);
        assert_eq!(pitch_origin(3), 71);
        assert_eq!(pitch_origin(9), -1);
    }

    #[test]
    fn test_to_musical_rows_and_ticks() {
        let mp = to_musical(ScreenPoint::new(CONTENT_ORIGIN_X, 0.0), 3);
        assert_eq!(mp.pitch, 71);
        assert_eq!(mp.time, 0.0);

        // Bottom pixel of the first row still belongs to it
        let mp = to_musical(ScreenPoint::new(CONTENT_ORIGIN_X + 30.0, ROW_HEIGHT_PX - 0.5), 3);
        assert_eq!(mp.pitch, 71);
        assert!((mp.time - 2.5).abs() < 1e-9);

        let mp = to_musical(ScreenPoint::new(0.0, ROW_HEIGHT_PX * 2.0), 3);
        assert_eq!(mp.pitch, 69);
        assert!(mp.time < 0.0);
    }

    #[test]
    fn test_round_trip_through_rect_center() {
        let notes = [
            Note::new(60, 0.0, 1.0),
            Note::new(71, 2.0, 6.0),
            Note::new(36, 12.5, 16.0),
            Note::new(0, 3.0, 4.0),
            Note::new(-5, 7.0, 9.0),
        ];

        for scroll_octave in -2..=11 {
            let cam = camera(scroll_octave);
            for note in &notes {
                let rect = to_screen_rect(note, cam);
                let mp = to_musical(rect.center(), scroll_octave);
                assert_eq!(mp.pitch, note.pitch, "octave {scroll_octave}, note {note:?}");
                assert!(
                    note.start <= mp.time && mp.time <= note.end,
                    "octave {scroll_octave}, note {note:?}, time {}",
                    mp.time
                );
            }
        }
    }

    #[test]
    fn test_ticks_to_px() {
        assert_eq!(ticks_to_px(1.0), PIXELS_PER_TICK);
        assert_eq!(ticks_to_px(0.25), 3.0);
    }
}
