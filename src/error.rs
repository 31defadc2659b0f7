//! Error types for the sequencing engine
//!
//! Each layer has its own error enum; `SequenceError` is the top-level type
//! returned by `NoteSequence` and wraps the others with `#[from]`.

use thiserror::Error;

use crate::models::duration::Duration;

/// Duration parsing and arithmetic failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// String is not one of `16n 8n 4n 2n 1n` with an optional `.`
    #[error("invalid duration: {0:?}")]
    Invalid(String),

    /// Doubling or halving would leave the representable scale
    #[error("cannot {op} {duration}: out of range")]
    OutOfRange { duration: Duration, op: &'static str },
}

/// Pitch parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    #[error("invalid pitch: {0:?}")]
    Invalid(String),
}

/// Undo/redo failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("No undo history available")]
    NothingToUndo,

    #[error("No redo history available")]
    NothingToRedo,

    /// The command refers to state that no longer exists (should not happen)
    #[error("stale command: {0}")]
    Stale(String),
}

/// Top-level error type for sequence operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error(transparent)]
    Pitch(#[from] PitchError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("note index {index} out of bounds (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no note selected")]
    NothingSelected,

    #[error("cannot delete the last remaining note")]
    LastNote,

    /// Tie split requested for a note that fits (or a bar with no room)
    #[error("note of {sixteenths} sixteenths needs no split with {available} available")]
    NoSplitNeeded { sixteenths: u32, available: u32 },

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for SequenceError {
    fn from(err: serde_json::Error) -> Self {
        SequenceError::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SequenceError>;
