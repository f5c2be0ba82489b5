//! Grid snapping and pattern-bounds clipping for new and resized notes.

use super::geometry::MusicalPoint;
use crate::score::Note;

/// Builds the note a click at `mp` would create: start snapped down to the
/// grid, `default_length` ticks long.
pub fn snap_to_grid(grid_size: f64, default_length: f64, mp: &MusicalPoint) -> Note {
    let start = (mp.time / grid_size).floor() * grid_size;
    Note::new(mp.pitch, start, start + default_length)
}

/// Fits a candidate note into a pattern of `pattern_length` ticks.
///
/// A note that starts outside the pattern is rejected. A note that starts
/// inside but overhangs the end is shifted left by the overhang, and rejected
/// only if that pushes its start below zero.
///
/// # Returns
///
/// The note to insert, or None if no valid placement exists
pub fn clip_to_pattern(note: Note, pattern_length: f64) -> Option<Note> {
    if note.start < 0.0 || note.start >= pattern_length {
        return None;
    }

    if note.end > pattern_length {
        let start = note.start - (note.end - pattern_length);
        if start < 0.0 {
            return None;
        }
        return Some(Note::new(note.pitch, start, pattern_length));
    }

    Some(note)
}

/// Rounds a raw tick delta to the nearest multiple of the grid size.
///
/// Used for resize drags so note edges move in whole grid steps. Halfway
/// deltas round away from zero.
pub fn snap_delta(grid_size: f64, raw_delta: f64) -> f64 {
    (raw_delta / grid_size).round() * grid_size
}
