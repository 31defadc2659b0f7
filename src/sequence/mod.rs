//! The note sequence: source of truth for notes, bars, selection and history
//!
//! `NoteSequence` owns the flat note list. The bar partition and the tie
//! fragments are derived from it and rebuilt in full after every change, so
//! callers never observe a half-updated partition.
//!
//! # Module Structure
//!
//! - `rebar`: bar partitioning and tie splitting
//! - `selection`: cursor, selection flags, note and bar navigation
//! - `editing`: mutating operations, all routed through the undo history
//! - `views`: serializable snapshots for the rendering layer

mod editing;
pub mod rebar;
mod selection;
pub mod views;

pub use rebar::{create_ties, partition};
pub use views::{BarView, LayoutView, NoteView};

use crate::error::{Result, SequenceError};
use crate::models::{Bar, EditorSettings, Note, NoteRecord, TieArena, TieFragment, TieId};
use crate::undo::UndoStack;

/// Ordered notes with their derived bar partition, cursor and undo history
#[derive(Clone, Debug)]
pub struct NoteSequence {
    notes: Vec<Note>,
    bars: Vec<Bar>,
    ties: TieArena,
    cursor: Option<usize>,
    history: UndoStack,
    settings: EditorSettings,
}

impl Default for NoteSequence {
    fn default() -> Self {
        Self::with_settings(EditorSettings::default())
    }
}

impl NoteSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            notes: Vec::new(),
            bars: Vec::new(),
            ties: TieArena::new(),
            cursor: None,
            history: UndoStack::new(settings.max_history),
            settings,
        }
    }

    /// Build from notes; selection and tie state on the inputs is discarded
    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let mut sequence = Self::new();
        sequence.load(notes);
        sequence
    }

    /// Build from pitch names, each with the default duration
    pub fn from_names(names: &[&str]) -> Result<Self> {
        let mut sequence = Self::new();
        sequence.load_names(names)?;
        Ok(sequence)
    }

    /// Build from `(name, duration, is_note)` triples
    pub fn from_triples(triples: &[(&str, &str, bool)]) -> Result<Self> {
        let records: Vec<NoteRecord> = triples
            .iter()
            .map(|&(name, duration, is_note)| NoteRecord::new(name, duration, is_note))
            .collect();
        Self::from_records(&records)
    }

    /// Build from persisted records
    pub fn from_records(records: &[NoteRecord]) -> Result<Self> {
        let notes = records
            .iter()
            .map(Note::from_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_notes(notes))
    }

    /// Build from the JSON form of a record list
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<NoteRecord> = serde_json::from_str(json)?;
        Self::from_records(&records)
    }

    /// Replace all notes, clearing selection and history
    pub fn load(&mut self, notes: impl IntoIterator<Item = Note>) {
        self.notes = notes
            .into_iter()
            .map(|mut note| {
                note.is_selected = false;
                note.clear_tie();
                note
            })
            .collect();
        self.cursor = None;
        self.history.clear();
        self.rebar();
        log::info!("loaded {} notes into {} bars", self.notes.len(), self.bars.len());
    }

    /// Replace all notes with `names`, each lasting `settings.default_duration`
    pub fn load_names(&mut self, names: &[&str]) -> Result<()> {
        let duration = self.settings.default_duration;
        let notes = names
            .iter()
            .map(|name| Note::new(name, duration))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.load(notes);
        Ok(())
    }

    pub fn to_records(&self) -> Vec<NoteRecord> {
        self.notes.iter().map(Note::to_record).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_records())?)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn first_note(&self) -> Option<&Note> {
        self.notes.first()
    }

    pub fn last_note(&self) -> Option<&Note> {
        self.notes.last()
    }

    pub fn all_note_names(&self) -> Vec<String> {
        self.notes.iter().map(Note::name).collect()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn ties(&self) -> &TieArena {
        &self.ties
    }

    pub fn fragment(&self, id: TieId) -> Option<&TieFragment> {
        self.ties.get(id)
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.notes.len() {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.notes.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Duration;

    #[test]
    fn test_to_records_shape() {
        let sequence = NoteSequence::from_triples(&[("E4", "4n", true), ("F4", "8n", true), ("G4", "16n", true)]).unwrap();

        assert_eq!(
            sequence.to_records(),
            vec![
                NoteRecord::new("E4", "4n", true),
                NoteRecord::new("F4", "8n", true),
                NoteRecord::new("G4", "16n", true),
            ]
        );
    }

    #[test]
    fn test_construct_from_names() {
        let sequence = NoteSequence::from_names(&["E4", "F4"]).unwrap();
        assert_eq!(sequence.all_note_names(), vec!["E4", "F4"]);
        assert_eq!(sequence.note(0).unwrap().duration, Duration::QUARTER);
    }

    #[test]
    fn test_names_take_configured_duration() {
        let settings = EditorSettings {
            default_duration: Duration::EIGHTH,
            ..EditorSettings::default()
        };
        let mut sequence = NoteSequence::with_settings(settings);
        sequence.load_names(&["E4", "F4", "G4"]).unwrap();

        assert!(sequence.notes().iter().all(|n| n.duration == Duration::EIGHTH));
        assert_eq!(sequence.bars()[0].sixteenths(), 6);
        assert!(sequence.load_names(&["E4", "Q9"]).is_err());
        assert_eq!(sequence.len(), 3);
    }

    #[test]
    fn test_construct_restores_rest_flag() {
        let sequence = NoteSequence::from_triples(&[("E4", "4n", false)]).unwrap();
        assert!(sequence.note(0).unwrap().is_rest());
    }

    #[test]
    fn test_empty_sequence_has_no_bars() {
        let sequence = NoteSequence::new();
        assert!(sequence.is_empty());
        assert!(sequence.bars().is_empty());
        assert!(sequence.first_note().is_none());
    }

    #[test]
    fn test_bad_input_fails_fast() {
        assert!(matches!(
            NoteSequence::from_triples(&[("E4", "3n", true)]),
            Err(SequenceError::Duration(_))
        ));
        assert!(matches!(
            NoteSequence::from_names(&["Q9"]),
            Err(SequenceError::Pitch(_))
        ));
        assert!(matches!(
            NoteSequence::from_json("[{\"name\": \"E4\"}]"),
            Err(SequenceError::Json(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"[{"name":"E4","duration":"2n.","isNote":true},{"name":"D4","duration":"8n","isNote":false}]"#;
        let sequence = NoteSequence::from_json(json).unwrap();
        assert_eq!(sequence.to_json().unwrap(), json);
    }
}
