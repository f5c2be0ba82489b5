//! Pattern container.
//!
//! A pattern is a fixed-length loop of notes. Note order is creation order,
//! which doubles as drawing order and as the tie-break for overlapping notes:
//! later notes sit on top.

use super::note::{IdNote, Note, NoteId};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A fixed-length sequence of identified notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Length of the pattern in ticks. Always positive.
    length: f64,

    /// Notes in creation order.
    notes: Vec<IdNote>,
}

impl Pattern {
    /// Creates an empty pattern.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPattern`] if `length` is not a positive,
    /// finite number of ticks.
    pub fn new(length: f64) -> Result<Self, StoreError> {
        let pattern = Self {
            length,
            notes: Vec::new(),
        };
        pattern.validate()?;
        Ok(pattern)
    }

    /// Returns the pattern length in ticks.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns all notes in creation order.
    pub fn notes(&self) -> &[IdNote] {
        &self.notes
    }

    /// Returns the number of notes in the pattern.
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Returns true if the pattern holds no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Appends a note on top of every existing note.
    pub fn push(&mut self, note: IdNote) {
        self.notes.push(note);
    }

    /// Removes a note by its ID.
    ///
    /// # Returns
    ///
    /// The removed note, or None if not found
    pub fn remove(&mut self, id: NoteId) -> Option<IdNote> {
        let pos = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(pos))
    }

    /// Replaces the note stored at `index` with `note`, keeping its id and
    /// its place in the stacking order.
    ///
    /// # Returns
    ///
    /// The id of the replaced note, or None if `index` is out of range
    pub fn replace_at(&mut self, index: usize, note: Note) -> Option<NoteId> {
        let slot = self.notes.get_mut(index)?;
        slot.note = note;
        Some(slot.id)
    }

    /// Returns the largest id in use, if any.
    pub fn max_id(&self) -> Option<NoteId> {
        self.notes.iter().map(|n| n.id).max()
    }

    /// Checks the structural invariants: positive length, every note inside
    /// `[0, length]` with `start < end`, unique ids, and room left in the id
    /// counter after the largest id.
    pub fn validate(&self) -> Result<(), StoreError> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(StoreError::InvalidPattern(format!(
                "length must be a positive number of ticks, got {}",
                self.length
            )));
        }

        let mut seen = HashSet::with_capacity(self.notes.len());
        for n in &self.notes {
            if !n.note.is_well_formed() || n.note.end > self.length {
                return Err(StoreError::InvalidPattern(format!(
                    "note {} spans [{}, {}] in a pattern of {} ticks",
                    n.id, n.note.start, n.note.end, self.length
                )));
            }
            if n.id.as_u64() == u64::MAX {
                return Err(StoreError::InvalidPattern(format!(
                    "note id {} leaves no room for new ids",
                    n.id
                )));
            }
            if !seen.insert(n.id) {
                return Err(StoreError::InvalidPattern(format!("duplicate note id {}", n.id)));
            }
        }

        Ok(())
    }

    /// Serializes the pattern to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a pattern from JSON.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let pattern: Self = serde_json::from_str(json)?;
        pattern.validate()?;
        Ok(pattern)
    }

    /// Encodes the pattern in the compact binary format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes and validates a pattern from the compact binary format.
    pub fn from_bytes(data: &[u8]) -> Result<Self, StoreError> {
        let pattern: Self = bincode::deserialize(data)?;
        pattern.validate()?;
        Ok(pattern)
    }

    /// Saves the pattern, choosing the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        match SaveFormat::from_path(path) {
            SaveFormat::Json => fs::write(path, self.to_json()?)?,
            SaveFormat::Binary => fs::write(path, self.to_bytes()?)?,
        }
        Ok(())
    }

    /// Loads a pattern, choosing the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns error if file reading, parsing or validation fails
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        match SaveFormat::from_path(path) {
            SaveFormat::Json => Self::from_json(&fs::read_to_string(path)?),
            SaveFormat::Binary => Self::from_bytes(&fs::read(path)?),
        }
    }
}

/// On-disk pattern formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFormat {
    /// Pretty-printed JSON (human-readable).
    #[default]
    Json,
    /// bincode encoding (compact).
    Binary,
}

impl SaveFormat {
    /// Picks the format for a path: `.bin` is binary, anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => SaveFormat::Binary,
            _ => SaveFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> NoteId {
        NoteId::from_counter(n)
    }

    #[test]
    fn test_pattern_rejects_bad_length() {
        assert!(Pattern::new(16.0).is_ok());
        assert!(Pattern::new(0.0).is_err());
        assert!(Pattern::new(-4.0).is_err());
        assert!(Pattern::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut pattern = Pattern::new(16.0).unwrap();
        pattern.push(IdNote::new(id(0), Note::new(1, 0.0, 1.0)));
        pattern.push(IdNote::new(id(1), Note::new(2, 0.0, 1.0)));
        pattern.push(IdNote::new(id(2), Note::new(3, 0.0, 1.0)));

        let removed = pattern.remove(id(1)).unwrap();
        assert_eq!(removed.note.pitch, 2);
        let ids: Vec<_> = pattern.notes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![id(0), id(2)]);
        assert!(pattern.remove(id(1)).is_none());
    }

    #[test]
    fn test_replace_at_keeps_identity() {
        let mut pattern = Pattern::new(16.0).unwrap();
        pattern.push(IdNote::new(id(4), Note::new(1, 0.0, 1.0)));

        assert_eq!(pattern.replace_at(0, Note::new(1, 0.0, 3.0)), Some(id(4)));
        assert_eq!(pattern.notes()[0].note.end, 3.0);
        assert_eq!(pattern.replace_at(1, Note::new(1, 0.0, 3.0)), None);
    }

    #[test]
    fn test_serialization() {
        let mut pattern = Pattern::new(16.0).unwrap();
        pattern.push(IdNote::new(id(0), Note::new(5, 2.0, 6.0)));

        let json = pattern.to_json().unwrap();
        assert_eq!(Pattern::from_json(&json).unwrap(), pattern);

        let bytes = pattern.to_bytes().unwrap();
        assert_eq!(Pattern::from_bytes(&bytes).unwrap(), pattern);
    }

    #[test]
    fn test_load_rejects_invalid_notes() {
        let inverted = r#"{"length":16.0,"notes":[{"id":0,"note":{"pitch":1,"start":4.0,"end":2.0}}]}"#;
        assert!(matches!(
            Pattern::from_json(inverted),
            Err(StoreError::InvalidPattern(_))
        ));

        let duplicate = r#"{"length":16.0,"notes":[
            {"id":3,"note":{"pitch":1,"start":0.0,"end":2.0}},
            {"id":3,"note":{"pitch":2,"start":0.0,"end":2.0}}]}"#;
        assert!(matches!(
            Pattern::from_json(duplicate),
            Err(StoreError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_load_rejects_notes_outside_pattern() {
        let past_end = r#"{"length":16.0,"notes":[{"id":0,"note":{"pitch":5,"start":17.0,"end":19.0}}]}"#;
        assert!(matches!(
            Pattern::from_json(past_end),
            Err(StoreError::InvalidPattern(_))
        ));

        let overhang = r#"{"length":16.0,"notes":[{"id":0,"note":{"pitch":5,"start":14.0,"end":17.0}}]}"#;
        assert!(Pattern::from_json(overhang).is_err());

        let touching_end = r#"{"length":16.0,"notes":[{"id":0,"note":{"pitch":5,"start":14.0,"end":16.0}}]}"#;
        assert!(Pattern::from_json(touching_end).is_ok());
    }

    #[test]
    fn test_load_rejects_exhausted_id() {
        let mut pattern = Pattern::new(16.0).unwrap();
        pattern.push(IdNote::new(id(u64::MAX), Note::new(5, 0.0, 1.0)));
        assert!(matches!(
            Pattern::from_bytes(&pattern.to_bytes().unwrap()),
            Err(StoreError::InvalidPattern(_))
        ));

        let mut pattern = Pattern::new(16.0).unwrap();
        pattern.push(IdNote::new(id(u64::MAX - 1), Note::new(5, 0.0, 1.0)));
        assert!(pattern.validate().is_ok());
    }

    #[test]
    fn test_save_format_from_path() {
        assert_eq!(SaveFormat::from_path(Path::new("a.json")), SaveFormat::Json);
        assert_eq!(SaveFormat::from_path(Path::new("a.BIN")), SaveFormat::Binary);
        assert_eq!(SaveFormat::from_path(Path::new("pattern")), SaveFormat::Json);
    }
}
