//! Editor configuration.
//!
//! Settings come from an optional JSON file; command-line flags override
//! individual values afterwards. Missing fields take their defaults.

use crate::editor::EditDefaults;
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Lowest scroll octave (highest pitch window).
pub const MIN_SCROLL_OCTAVE: i32 = 0;

/// Highest scroll octave (lowest pitch window).
pub const MAX_SCROLL_OCTAVE: i32 = 9;

/// Settings supplied to the editor by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Length of a newly created pattern, in ticks.
    pub pattern_length: f64,

    /// Initial grid size in ticks.
    pub grid_size: f64,

    /// Initial length of new notes in ticks.
    pub note_size: f64,

    /// Initial vertical scroll position.
    pub scroll_octave: i32,

    /// Grid sizes the `g` key cycles through.
    pub grid_choices: Vec<f64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pattern_length: 16.0,
            grid_size: 1.0,
            note_size: 1.0,
            scroll_octave: 3,
            grid_choices: vec![0.25, 0.5, 1.0, 2.0, 4.0],
        }
    }
}

impl EditorConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid JSON, or holds
    /// out-of-range values
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every size is a positive tick count and the scroll
    /// position is in range.
    pub fn validate(&self) -> Result<(), StoreError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(StoreError::InvalidConfig(format!(
                    "{name} must be a positive number of ticks, got {value}"
                )))
            }
        };

        positive("pattern_length", self.pattern_length)?;
        positive("grid_size", self.grid_size)?;
        positive("note_size", self.note_size)?;
        for &choice in &self.grid_choices {
            positive("grid_choices entry", choice)?;
        }

        if !(MIN_SCROLL_OCTAVE..=MAX_SCROLL_OCTAVE).contains(&self.scroll_octave) {
            return Err(StoreError::InvalidConfig(format!(
                "scroll_octave must be between {MIN_SCROLL_OCTAVE} and {MAX_SCROLL_OCTAVE}, got {}",
                self.scroll_octave
            )));
        }

        Ok(())
    }

    /// Editing defaults for a fresh session.
    pub fn edit_defaults(&self) -> EditDefaults {
        EditDefaults {
            grid_size: self.grid_size,
            note_size: self.note_size,
            next_id: 0,
        }
    }

    /// Returns the grid size following `current` in `grid_choices`,
    /// wrapping around. Falls back to the first choice if `current` is not
    /// in the list.
    pub fn next_grid_size(&self, current: f64) -> Option<f64> {
        let first = *self.grid_choices.first()?;
        let next = self
            .grid_choices
            .iter()
            .position(|&g| g == current)
            .and_then(|i| self.grid_choices.get(i + 1).copied())
            .unwrap_or(first);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.edit_defaults(), EditDefaults::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"note_size": 4.0}"#).unwrap();
        assert_eq!(config.note_size, 4.0);
        assert_eq!(config.pattern_length, 16.0);
        assert_eq!(config.scroll_octave, 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = EditorConfig {
            grid_size: 0.0,
            ..EditorConfig::default()
        };
        assert!(matches!(config.validate(), Err(StoreError::InvalidConfig(_))));

        let config = EditorConfig {
            scroll_octave: 12,
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EditorConfig {
            grid_choices: vec![1.0, -2.0],
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_next_grid_size_cycles() {
        let config = EditorConfig::default();
        assert_eq!(config.next_grid_size(1.0), Some(2.0));
        assert_eq!(config.next_grid_size(4.0), Some(0.25));
        assert_eq!(config.next_grid_size(3.0), Some(0.25));

        let empty = EditorConfig {
            grid_choices: Vec::new(),
            ..EditorConfig::default()
        };
        assert_eq!(empty.next_grid_size(1.0), None);
    }
}
