//! Error types for the editor engine and pattern storage.
//!
//! Rejected edits are not errors: a click that cannot produce a valid note
//! simply leaves the pattern unchanged. The types here cover host contract
//! violations and file handling.

use thiserror::Error;

/// A pointer event sequence the engine cannot interpret.
///
/// These indicate a bug in the host (or a terminal that dropped a button
/// release), never a user mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditorError {
    /// A press arrived while a previous press had not been released yet.
    #[error("mouse pressed while a {mode} gesture is still active")]
    PressWhileDragging {
        /// Name of the mode that was active when the press arrived.
        mode: &'static str,
    },
}

/// Errors that can occur while loading or saving patterns and configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary encoding or decoding failed.
    #[error("binary format error: {0}")]
    Binary(#[from] bincode::Error),

    /// The data parsed, but does not describe a valid pattern.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// The data parsed, but does not describe a valid editor configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
