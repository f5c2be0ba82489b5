//! Hit-testing notes at a musical point.
//!
//! Overlapping notes resolve to the one created last, which is also the one
//! drawn on top.

use super::geometry::MusicalPoint;
use crate::score::IdNote;

/// Returns the topmost note covering `mp`.
pub fn find_at<'a>(notes: &'a [IdNote], mp: &MusicalPoint) -> Option<&'a IdNote> {
    notes.iter().rev().find(|n| n.note.covers(mp.pitch, mp.time))
}

/// Returns the index of the topmost note covering `mp`.
pub fn find_index_at(notes: &[IdNote], mp: &MusicalPoint) -> Option<usize> {
    notes.iter().rposition(|n| n.note.covers(mp.pitch, mp.time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{Note, NoteId};

    fn at(pitch: i32, time: f64) -> MusicalPoint {
        MusicalPoint {
            x: 0.0,
            y: 0.0,
            pitch,
            time,
        }
    }

    fn note(id: u64, pitch: i32, start: f64, end: f64) -> IdNote {
        IdNote::new(NoteId::from_counter(id), Note::new(pitch, start, end))
    }

    #[test]
    fn test_find_on_empty() {
        assert!(find_at(&[], &at(0, 0.0)).is_none());
        assert!(find_index_at(&[], &at(0, 0.0)).is_none());
    }

    #[test]
    fn test_overlap_prefers_later_note() {
        // The later note starts earlier and ends earlier; order alone decides
        let notes = [note(0, 5, 2.0, 8.0), note(1, 5, 1.0, 4.0)];

        let found = find_at(&notes, &at(5, 3.0)).unwrap();
        assert_eq!(found.id, NoteId::from_counter(1));
        assert_eq!(find_index_at(&notes, &at(5, 3.0)), Some(1));

        // Outside the later note only the earlier one matches
        assert_eq!(find_index_at(&notes, &at(5, 6.0)), Some(0));
    }

    #[test]
    fn test_pitch_must_match() {
        let notes = [note(0, 5, 0.0, 4.0), note(1, 6, 0.0, 4.0)];
        assert_eq!(find_at(&notes, &at(5, 1.0)).map(|n| n.id.as_u64()), Some(0));
        assert!(find_at(&notes, &at(7, 1.0)).is_none());
    }

    #[test]
    fn test_edges_are_inclusive() {
        let notes = [note(0, 5, 2.0, 6.0)];
        assert!(find_at(&notes, &at(5, 2.0)).is_some());
        assert!(find_at(&notes, &at(5, 6.0)).is_some());
        assert!(find_at(&notes, &at(5, 6.5)).is_none());
    }
}
