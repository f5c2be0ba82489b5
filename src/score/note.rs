//! Note representation.
//!
//! A note is a pitch row plus a half-open span of ticks. Ticks are real
//! numbers so that patterns can use any grid resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a note within a pattern.
///
/// Ids come from a strictly increasing counter owned by the editor defaults
/// and are never reused, even after the note they named is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    /// Wraps a raw counter value.
    pub fn from_counter(counter: u64) -> Self {
        Self(counter)
    }

    /// Returns the raw ID value (for serialization/debugging).
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A single note event without identity.
///
/// Invariant for every note stored in a pattern: `0 <= start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Scale-degree row. Higher values are drawn higher on screen.
    pub pitch: i32,

    /// Start time in ticks from the beginning of the pattern.
    pub start: f64,

    /// End time in ticks. Always greater than `start`.
    pub end: f64,
}

impl Note {
    /// Creates a note spanning `[start, end]` on the given pitch row.
    ///
    /// # Examples
    ///
    /// ```
    /// use rolledit::score::Note;
    ///
    /// let note = Note::new(5, 2.0, 6.0);
    /// assert_eq!(note.length(), 4.0);
    /// ```
    pub fn new(pitch: i32, start: f64, end: f64) -> Self {
        Self { pitch, start, end }
    }

    /// Returns the duration in ticks.
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Returns the tick halfway between start and end.
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Checks whether the note covers `tick`, both edges included.
    ///
    /// Edges are inclusive so that clicking exactly on a note boundary still
    /// grabs the note.
    pub fn covers(&self, pitch: i32, tick: f64) -> bool {
        self.pitch == pitch && self.start <= tick && tick <= self.end
    }

    /// Checks the storage invariant `0 <= start < end`.
    pub fn is_well_formed(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && 0.0 <= self.start && self.start < self.end
    }

    /// Returns a copy with a new start tick.
    pub fn with_start(self, start: f64) -> Self {
        Self { start, ..self }
    }

    /// Returns a copy with a new end tick.
    pub fn with_end(self, end: f64) -> Self {
        Self { end, ..self }
    }
}

/// A note stored in a pattern, tagged with its identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdNote {
    /// Identity used for deletion and history.
    pub id: NoteId,

    /// The note itself.
    pub note: Note,
}

impl IdNote {
    pub fn new(id: NoteId, note: Note) -> Self {
        Self { id, note }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_id_display() {
        assert_eq!(NoteId::from_counter(0).to_string(), "n0");
        assert_eq!(NoteId::from_counter(17).to_string(), "n17");
    }

    #[test]
    fn test_note_covers_inclusive_edges() {
        let note = Note::new(5, 2.0, 6.0);
        assert!(note.covers(5, 2.0));
        assert!(note.covers(5, 4.5));
        assert!(note.covers(5, 6.0));
        assert!(!note.covers(5, 6.01));
        assert!(!note.covers(4, 3.0));
    }

    #[test]
    fn test_note_well_formed() {
        assert!(Note::new(0, 0.0, 1.0).is_well_formed());
        assert!(!Note::new(0, -1.0, 1.0).is_well_formed());
        assert!(!Note::new(0, 2.0, 2.0).is_well_formed());
        assert!(!Note::new(0, 0.0, f64::NAN).is_well_formed());
    }

    #[test]
    fn test_midpoint() {
        let note = Note::new(0, 2.0, 6.0);
        assert_eq!(note.midpoint(), 4.0);
        assert_eq!(note.with_end(10.0).midpoint(), 6.0);
        assert_eq!(note.with_start(0.0).length(), 6.0);
    }
}
