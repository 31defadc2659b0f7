//! Editor configuration

use serde::{Deserialize, Serialize};

use super::duration::Duration;
use crate::error::SequenceError;

/// Tunables for a `NoteSequence`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Maximum number of commands kept for undo
    pub max_history: usize,

    /// Duration given to notes constructed from a bare pitch name
    pub default_duration: Duration,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            max_history: 100,
            default_duration: Duration::QUARTER,
        }
    }
}

impl EditorSettings {
    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SequenceError> {
        Ok(serde_json::from_str(json)?)
    }
}
