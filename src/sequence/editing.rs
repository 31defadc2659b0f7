//! Mutating operations on the selected note, recorded in the undo history

use crate::error::{Result, SequenceError};
use crate::models::{Duration, Note};
use crate::undo::Command;

use super::NoteSequence;

impl NoteSequence {
    fn require_selection(&self) -> Result<usize> {
        self.cursor.ok_or(SequenceError::NothingSelected)
    }

    /// Apply a command, record it, then rebuild bars and selection
    fn execute(&mut self, command: Command) -> Result<()> {
        command.execute(&mut self.notes)?;
        let cursor = command.cursor_after_execute(self.cursor, self.notes.len());
        log::debug!("{} at note {}", command.label(), command.index());

        self.history.push(command);
        self.rebar();
        self.place_cursor(cursor);
        Ok(())
    }

    fn change_selected_duration(&mut self, index: usize, to: Duration) -> Result<()> {
        let from = self.notes[index].duration;
        if from == to {
            return Ok(());
        }
        self.execute(Command::ChangeDuration { index, from, to })
    }

    /// Give the selected note a new duration
    pub fn set_selected_to(&mut self, duration: Duration) -> Result<()> {
        let index = self.require_selection()?;
        self.change_selected_duration(index, duration)
    }

    /// Halve the selected note; fails on a sixteenth or a dotted eighth
    pub fn halve_selected_duration(&mut self) -> Result<()> {
        let index = self.require_selection()?;
        let to = self.notes[index].duration.halve()?;
        self.change_selected_duration(index, to)
    }

    /// Double the selected note; fails on a whole or a dotted half
    pub fn double_selected_duration(&mut self) -> Result<()> {
        let index = self.require_selection()?;
        let to = self.notes[index].duration.double()?;
        self.change_selected_duration(index, to)
    }

    /// Add or remove the dot; whole and sixteenth notes are left alone
    pub fn toggle_dot_for_selected(&mut self) -> Result<()> {
        let index = self.require_selection()?;
        let duration = self.notes[index].duration;
        if duration.toggle_dot() == duration {
            return Ok(());
        }
        self.execute(Command::ToggleDot { index })
    }

    /// Insert a copy of the selected note after it and select the copy
    pub fn duplicate_note(&mut self) -> Result<()> {
        let index = self.require_selection()?;
        self.execute(Command::Duplicate { index })
    }

    /// Remove the selected note. The only remaining note cannot be deleted.
    pub fn delete_selected(&mut self) -> Result<()> {
        let index = self.require_selection()?;
        if self.notes.len() == 1 {
            return Err(SequenceError::LastNote);
        }
        let note = self.notes[index].clone();
        self.execute(Command::Delete { index, note })
    }

    pub fn increment_selected(&mut self) -> Result<()> {
        let index = self.require_selection()?;
        match self.notes[index].pitch() {
            Some(from) if !from.is_highest() => self.execute(Command::Increment { index, from }),
            _ => Ok(()),
        }
    }

    pub fn decrement_selected(&mut self) -> Result<()> {
        let index = self.require_selection()?;
        match self.notes[index].pitch() {
            Some(from) if !from.is_lowest() => self.execute(Command::Decrement { index, from }),
            _ => Ok(()),
        }
    }

    pub fn toggle_rest_for_selected(&mut self) -> Result<()> {
        let index = self.require_selection()?;
        self.execute(Command::ToggleRest { index })
    }

    /// Append a note
    pub fn add(&mut self, note: Note) -> Result<()> {
        self.add_all(std::iter::once(note))
    }

    /// Append notes as a single undoable step
    pub fn add_all(&mut self, notes: impl IntoIterator<Item = Note>) -> Result<()> {
        let notes: Vec<Note> = notes
            .into_iter()
            .map(|mut note| {
                note.is_selected = false;
                note.clear_tie();
                note
            })
            .collect();
        if notes.is_empty() {
            return Ok(());
        }
        let index = self.notes.len();
        self.execute(Command::Add { index, notes })
    }

    /// Reverse the most recent command
    pub fn undo(&mut self) -> Result<Command> {
        let command = self.history.undo(&mut self.notes)?;
        let cursor = command.cursor_after_undo(self.cursor, self.notes.len());
        log::debug!("undo {} at note {}", command.label(), command.index());

        self.rebar();
        self.place_cursor(cursor);
        Ok(command)
    }

    /// Reapply the most recently undone command
    pub fn redo(&mut self) -> Result<Command> {
        let command = self.history.redo(&mut self.notes)?;
        let cursor = command.cursor_after_execute(self.cursor, self.notes.len());
        log::debug!("redo {} at note {}", command.label(), command.index());

        self.rebar();
        self.place_cursor(cursor);
        Ok(command)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{DurationError, HistoryError, SequenceError};
    use crate::models::{Duration, EditorSettings, Note};
    use crate::sequence::NoteSequence;

    fn sequence() -> NoteSequence {
        NoteSequence::from_triples(&[("E4", "4n", true), ("F4", "8n", true), ("G4", "16n", true)]).unwrap()
    }

    #[test]
    fn test_mutators_need_a_selection() {
        let mut sequence = sequence();
        assert_eq!(sequence.toggle_dot_for_selected(), Err(SequenceError::NothingSelected));
        assert_eq!(sequence.delete_selected(), Err(SequenceError::NothingSelected));
        assert_eq!(sequence.set_selected_to(Duration::HALF), Err(SequenceError::NothingSelected));
        assert!(!sequence.can_undo());
    }

    #[test]
    fn test_set_selected_duration() {
        let mut sequence = sequence();
        sequence.select(1).unwrap();
        sequence.set_selected_to(Duration::HALF).unwrap();

        assert_eq!(sequence.note(1).unwrap().duration, Duration::HALF);
        assert_eq!(sequence.selected_index(), Some(1));
        assert_eq!(sequence.undo_count(), 1);
    }

    #[test]
    fn test_same_duration_is_not_recorded() {
        let mut sequence = sequence();
        sequence.select(0).unwrap();
        sequence.set_selected_to(Duration::QUARTER).unwrap();
        assert!(!sequence.can_undo());
    }

    #[test]
    fn test_halve_and_double() {
        let mut sequence = sequence();
        sequence.select(0).unwrap();
        sequence.halve_selected_duration().unwrap();
        assert_eq!(sequence.note(0).unwrap().duration, Duration::EIGHTH);

        sequence.double_selected_duration().unwrap();
        sequence.double_selected_duration().unwrap();
        assert_eq!(sequence.note(0).unwrap().duration, Duration::HALF);
        assert_eq!(sequence.undo_count(), 3);
    }

    #[test]
    fn test_halve_sixteenth_is_rejected() {
        let mut sequence = sequence();
        sequence.select(2).unwrap();
        assert!(matches!(
            sequence.halve_selected_duration(),
            Err(SequenceError::Duration(DurationError::OutOfRange { .. }))
        ));
        assert!(!sequence.can_undo());
    }

    #[test]
    fn test_toggle_dot_skips_sixteenth() {
        let mut sequence = sequence();
        sequence.select(2).unwrap();
        sequence.toggle_dot_for_selected().unwrap();
        assert_eq!(sequence.note(2).unwrap().duration, Duration::SIXTEENTH);
        assert!(!sequence.can_undo());

        sequence.select(0).unwrap();
        sequence.toggle_dot_for_selected().unwrap();
        assert_eq!(sequence.note(0).unwrap().duration, Duration::DOTTED_QUARTER);
    }

    #[test]
    fn test_duplicate_selects_copy() {
        let mut sequence = sequence();
        sequence.select(0).unwrap();
        sequence.duplicate_note().unwrap();

        assert_eq!(sequence.all_note_names(), vec!["E4", "E4", "F4", "G4"]);
        assert_eq!(sequence.selected_index(), Some(1));
        assert_eq!(sequence.notes().iter().filter(|n| n.is_selected).count(), 1);
    }

    #[test]
    fn test_delete_moves_cursor() {
        let mut sequence = sequence();
        sequence.select(2).unwrap();
        sequence.delete_selected().unwrap();
        assert_eq!(sequence.all_note_names(), vec!["E4", "F4"]);
        assert_eq!(sequence.selected_index(), Some(1));

        sequence.select(0).unwrap();
        sequence.delete_selected().unwrap();
        assert_eq!(sequence.all_note_names(), vec!["F4"]);
        assert_eq!(sequence.selected_index(), Some(0));
    }

    #[test]
    fn test_last_note_cannot_be_deleted() {
        let mut sequence = NoteSequence::from_names(&["E4"]).unwrap();
        sequence.select(0).unwrap();
        assert_eq!(sequence.delete_selected(), Err(SequenceError::LastNote));
        assert_eq!(sequence.len(), 1);
        assert!(!sequence.can_undo());
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut sequence = NoteSequence::from_names(&["B4", "C1", "C8"]).unwrap();
        sequence.select(0).unwrap();
        sequence.increment_selected().unwrap();
        assert_eq!(sequence.note(0).unwrap().name(), "C5");

        sequence.decrement_selected().unwrap();
        sequence.decrement_selected().unwrap();
        assert_eq!(sequence.note(0).unwrap().name(), "A4");

        sequence.select(1).unwrap();
        sequence.decrement_selected().unwrap();
        sequence.select(2).unwrap();
        sequence.increment_selected().unwrap();
        assert_eq!(sequence.all_note_names(), vec!["A4", "C1", "C8"]);
        assert_eq!(sequence.undo_count(), 3);
    }

    #[test]
    fn test_toggle_rest_keeps_pitch() {
        let mut sequence = sequence();
        sequence.select(1).unwrap();
        sequence.toggle_rest_for_selected().unwrap();
        assert!(sequence.note(1).unwrap().is_rest());
        assert_eq!(sequence.note(1).unwrap().name(), "F4");

        sequence.toggle_rest_for_selected().unwrap();
        assert!(!sequence.note(1).unwrap().is_rest());
    }

    #[test]
    fn test_add_appends_without_moving_cursor() {
        let mut sequence = sequence();
        sequence.select(1).unwrap();
        sequence
            .add_all(vec![
                Note::new("A4", Duration::HALF).unwrap(),
                Note::new("B4", Duration::HALF).unwrap(),
            ])
            .unwrap();

        assert_eq!(sequence.len(), 5);
        assert_eq!(sequence.selected_index(), Some(1));
        assert_eq!(sequence.undo_count(), 1);

        sequence.undo().unwrap();
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.selected_index(), Some(1));
    }

    #[test]
    fn test_add_nothing_is_not_recorded() {
        let mut sequence = sequence();
        sequence.add_all(Vec::new()).unwrap();
        assert!(!sequence.can_undo());
    }

    #[test]
    fn test_edits_rebar() {
        let mut sequence = NoteSequence::from_names(&["C4", "D4", "E4", "F4"]).unwrap();
        assert_eq!(sequence.bars().len(), 1);

        sequence.select(3).unwrap();
        sequence.double_selected_duration().unwrap();

        assert_eq!(sequence.bars().len(), 2);
        assert!(sequence.note(3).unwrap().is_represented_as_tie());
        assert!(sequence.ties().iter().all(|(_, f)| f.is_selected));
    }

    #[test]
    fn test_empty_history_errors() {
        let mut sequence = sequence();
        assert_eq!(sequence.undo(), Err(SequenceError::History(HistoryError::NothingToUndo)));
        assert_eq!(sequence.redo(), Err(SequenceError::History(HistoryError::NothingToRedo)));
    }

    #[test]
    fn test_history_limit_from_settings() {
        let settings = EditorSettings {
            max_history: 2,
            ..EditorSettings::default()
        };
        let mut sequence = NoteSequence::with_settings(settings);
        sequence.add(Note::new("E4", Duration::QUARTER).unwrap()).unwrap();
        sequence.select(0).unwrap();
        for _ in 0..4 {
            sequence.toggle_rest_for_selected().unwrap();
        }

        assert_eq!(sequence.undo_count(), 2);
        sequence.undo().unwrap();
        sequence.undo().unwrap();
        assert!(!sequence.can_undo());
        assert_eq!(sequence.len(), 1);
    }
}
