//! Musical data structures edited by the piano roll.
//!
//! This module provides the note, note identity, and pattern types. The
//! pattern is owned by the host; the editor only reads its length and
//! rewrites its note sequence.

mod note;
mod pattern;

pub use note::{IdNote, Note, NoteId};
pub use pattern::{Pattern, SaveFormat};

/// Pitch class names used for row labels.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Converts a pitch row to a label with octave, e.g. `"C3"` or `"F#0"`.
///
/// Rows below zero wrap into negative octaves.
///
/// # Examples
///
/// ```
/// use rolledit::score::pitch_label;
///
/// assert_eq!(pitch_label(36), "C3");
/// assert_eq!(pitch_label(-1), "B-1");
/// ```
pub fn pitch_label(pitch: i32) -> String {
    let octave = pitch.div_euclid(12);
    let index = pitch.rem_euclid(12) as usize;
    format!("{}{}", NOTE_NAMES[index], octave)
}

/// Returns true if the pitch row falls on a black key.
pub fn is_black_key(pitch: i32) -> bool {
    matches!(pitch.rem_euclid(12), 1 | 3 | 6 | 8 | 10)
}
