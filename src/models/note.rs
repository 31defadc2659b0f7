//! Note entity and its persisted record form

use serde::{Deserialize, Serialize};

use super::duration::Duration;
use super::pitch::Pitch;
use super::tie::TiePair;
use crate::error::{PitchError, SequenceError};

/// Name used for a rest that never had a pitch
pub const REST_NAME: &str = "R";

/// A pitched note or a rest.
///
/// A rest created by toggling a note keeps its pitch so toggling back restores
/// it. `tie` is derived state owned by the sequence's rebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pitch: Option<Pitch>,
    pub duration: Duration,
    pub is_note: bool,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(skip)]
    tie: Option<TiePair>,
}

impl Note {
    /// Build from a pitch name (`"E4"`) or the rest marker `"R"`
    pub fn new(name: &str, duration: Duration) -> Result<Self, PitchError> {
        if name == REST_NAME {
            return Ok(Note::rest(duration));
        }
        Ok(Note::pitched(Pitch::parse(name)?, duration))
    }

    pub fn pitched(pitch: Pitch, duration: Duration) -> Self {
        Note {
            pitch: Some(pitch),
            duration,
            is_note: true,
            is_selected: false,
            tie: None,
        }
    }

    pub fn rest(duration: Duration) -> Self {
        Note {
            pitch: None,
            duration,
            is_note: false,
            is_selected: false,
            tie: None,
        }
    }

    pub fn pitch(&self) -> Option<Pitch> {
        self.pitch
    }

    pub fn set_pitch(&mut self, pitch: Option<Pitch>) {
        self.pitch = pitch;
    }

    /// Letter + octave, or the rest marker for a pitchless rest
    pub fn name(&self) -> String {
        self.pitch
            .map(|p| p.to_string())
            .unwrap_or_else(|| REST_NAME.to_string())
    }

    pub fn is_rest(&self) -> bool {
        !self.is_note
    }

    pub fn rest_toggle(&mut self) {
        self.is_note = !self.is_note;
    }

    pub fn sixteenths(&self) -> u32 {
        self.duration.to_sixteenths()
    }

    pub fn dot_sixteenths(&self) -> u32 {
        self.duration.dotted_sixteenths()
    }

    pub fn is_dotted(&self) -> bool {
        self.duration.is_dotted()
    }

    /// Returns false when the base cannot take a dot
    pub fn toggle_dot(&mut self) -> bool {
        let toggled = self.duration.toggle_dot();
        let changed = toggled != self.duration;
        self.duration = toggled;
        changed
    }

    /// Step up the scale; false at C8 or without a pitch
    pub fn increment(&mut self) -> bool {
        match self.pitch.and_then(|p| p.incremented()) {
            Some(next) => {
                self.pitch = Some(next);
                true
            }
            None => false,
        }
    }

    /// Step down the scale; false at C1 or without a pitch
    pub fn decrement(&mut self) -> bool {
        match self.pitch.and_then(|p| p.decremented()) {
            Some(prev) => {
                self.pitch = Some(prev);
                true
            }
            None => false,
        }
    }

    pub fn is_represented_as_tie(&self) -> bool {
        self.tie.is_some()
    }

    pub fn tie(&self) -> Option<&TiePair> {
        self.tie.as_ref()
    }

    pub fn set_tie(&mut self, pair: TiePair) {
        self.tie = Some(pair);
    }

    pub fn clear_tie(&mut self) {
        self.tie = None;
    }

    pub fn to_record(&self) -> NoteRecord {
        NoteRecord {
            name: self.name(),
            duration: self.duration.to_string(),
            is_note: self.is_note,
        }
    }

    /// Rebuild from a persisted record. An empty or `"R"` name is a pitchless rest.
    pub fn from_record(record: &NoteRecord) -> Result<Self, SequenceError> {
        let duration = Duration::parse(&record.duration)?;
        let mut note = if record.name.is_empty() || record.name == REST_NAME {
            Note::rest(duration)
        } else {
            Note::new(&record.name, duration)?
        };
        note.is_note = record.is_note;
        Ok(note)
    }
}

/// Persisted/exchanged form: `{ name, duration, isNote }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    #[serde(default)]
    pub name: String,
    pub duration: String,
    #[serde(default = "default_true")]
    pub is_note: bool,
}

fn default_true() -> bool {
    true
}

impl NoteRecord {
    pub fn new(name: &str, duration: &str, is_note: bool) -> Self {
        NoteRecord {
            name: name.to_string(),
            duration: duration.to_string(),
            is_note,
        }
    }
}
