//! rolledit - A terminal piano roll pattern editor.
//!
//! This library provides the note editing engine and the terminal host
//! around it.

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod score;
pub mod ui;

// Re-export commonly used types
pub use app::App;
pub use config::EditorConfig;
pub use editor::{EditDefaults, EditOutcome, InteractionMode, RollEditor};
pub use error::{EditorError, StoreError};
pub use score::{IdNote, Note, NoteId, Pattern};
