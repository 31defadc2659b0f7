use crate::error::HistoryError;
use crate::models::{Duration, Note, Pitch};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Represents a reversible edit to a note list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replace a note's duration
    ChangeDuration {
        index: usize,
        from: Duration,
        to: Duration,
    },
    /// Add or remove the dot (self-inverse)
    ToggleDot { index: usize },
    /// Insert a copy of the note right after it
    Duplicate { index: usize },
    /// Remove a note
    Delete {
        index: usize,
        /// The note that was deleted (for restoration)
        note: Note,
    },
    /// Step the pitch up one scale degree
    Increment { index: usize, from: Pitch },
    /// Step the pitch down one scale degree
    Decrement { index: usize, from: Pitch },
    /// Switch between note and rest (self-inverse)
    ToggleRest { index: usize },
    /// Insert notes starting at `index`
    Add { index: usize, notes: Vec<Note> },
}

fn note_mut(notes: &mut [Note], index: usize) -> Result<&mut Note, HistoryError> {
    let len = notes.len();
    notes
        .get_mut(index)
        .ok_or_else(|| HistoryError::Stale(format!("note {} not found (length {})", index, len)))
}

fn check_insert(notes: &[Note], index: usize) -> Result<(), HistoryError> {
    if index > notes.len() {
        return Err(HistoryError::Stale(format!(
            "insert position {} past end (length {})",
            index,
            notes.len()
        )));
    }
    Ok(())
}

impl Command {
    /// Apply this command to the note list
    pub fn execute(&self, notes: &mut Vec<Note>) -> Result<(), HistoryError> {
        match self {
            Command::ChangeDuration { index, to, .. } => {
                note_mut(notes, *index)?.duration = *to;
                Ok(())
            }
            Command::ToggleDot { index } => {
                note_mut(notes, *index)?.toggle_dot();
                Ok(())
            }
            Command::Duplicate { index } => {
                let mut copy = note_mut(notes, *index)?.clone();
                copy.is_selected = false;
                copy.clear_tie();
                notes.insert(index + 1, copy);
                Ok(())
            }
            Command::Delete { index, .. } => {
                note_mut(notes, *index)?;
                notes.remove(*index);
                Ok(())
            }
            Command::Increment { index, from } => {
                let next = from
                    .incremented()
                    .ok_or_else(|| HistoryError::Stale(format!("{} has no higher pitch", from)))?;
                note_mut(notes, *index)?.set_pitch(Some(next));
                Ok(())
            }
            Command::Decrement { index, from } => {
                let prev = from
                    .decremented()
                    .ok_or_else(|| HistoryError::Stale(format!("{} has no lower pitch", from)))?;
                note_mut(notes, *index)?.set_pitch(Some(prev));
                Ok(())
            }
            Command::ToggleRest { index } => {
                note_mut(notes, *index)?.rest_toggle();
                Ok(())
            }
            Command::Add { index, notes: added } => {
                check_insert(notes, *index)?;
                for (offset, note) in added.iter().enumerate() {
                    notes.insert(index + offset, note.clone());
                }
                Ok(())
            }
        }
    }

    /// Undo this command (reverse the operation)
    pub fn undo(&self, notes: &mut Vec<Note>) -> Result<(), HistoryError> {
        match self {
            Command::ChangeDuration { index, from, .. } => {
                note_mut(notes, *index)?.duration = *from;
                Ok(())
            }
            Command::ToggleDot { index } => {
                note_mut(notes, *index)?.toggle_dot();
                Ok(())
            }
            Command::Duplicate { index } => {
                note_mut(notes, index + 1)?;
                notes.remove(index + 1);
                Ok(())
            }
            Command::Delete { index, note } => {
                check_insert(notes, *index)?;
                notes.insert(*index, note.clone());
                Ok(())
            }
            Command::Increment { index, from } | Command::Decrement { index, from } => {
                note_mut(notes, *index)?.set_pitch(Some(*from));
                Ok(())
            }
            Command::ToggleRest { index } => {
                note_mut(notes, *index)?.rest_toggle();
                Ok(())
            }
            Command::Add { index, notes: added } => {
                let end = index + added.len();
                if end > notes.len() {
                    return Err(HistoryError::Stale(format!(
                        "added range {}..{} past end (length {})",
                        index,
                        end,
                        notes.len()
                    )));
                }
                for _ in 0..added.len() {
                    notes.remove(*index);
                }
                Ok(())
            }
        }
    }

    /// Index of the note this command acts on
    pub fn index(&self) -> usize {
        match self {
            Command::ChangeDuration { index, .. }
            | Command::ToggleDot { index }
            | Command::Duplicate { index }
            | Command::Delete { index, .. }
            | Command::Increment { index, .. }
            | Command::Decrement { index, .. }
            | Command::ToggleRest { index }
            | Command::Add { index, .. } => *index,
        }
    }

    /// Cursor once the command has been applied to a list now `len` long
    pub fn cursor_after_execute(&self, prior: Option<usize>, len: usize) -> Option<usize> {
        match self {
            Command::Add { .. } => prior.filter(|&i| i < len),
            Command::Duplicate { index } => Some(index + 1),
            Command::Delete { index, .. } => len.checked_sub(1).map(|last| (*index).min(last)),
            _ => Some(self.index()),
        }
    }

    /// Cursor once the command has been undone
    pub fn cursor_after_undo(&self, prior: Option<usize>, len: usize) -> Option<usize> {
        match self {
            Command::Add { .. } => prior.filter(|&i| i < len),
            _ => Some(self.index()),
        }
    }

    /// Short name for logging
    pub fn label(&self) -> &'static str {
        match self {
            Command::ChangeDuration { .. } => "change duration",
            Command::ToggleDot { .. } => "toggle dot",
            Command::Duplicate { .. } => "duplicate",
            Command::Delete { .. } => "delete",
            Command::Increment { .. } => "increment",
            Command::Decrement { .. } => "decrement",
            Command::ToggleRest { .. } => "toggle rest",
            Command::Add { .. } => "add",
        }
    }
}

/// Linear undo/redo history.
///
/// `commands[..current_index]` can be undone, `commands[current_index..]` redone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    pub commands: VecDeque<Command>,
    /// Current position in the stack (for redo support)
    pub current_index: usize,
    /// Maximum number of commands to keep in history
    max_size: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl UndoStack {
    /// Create a new undo stack with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            commands: VecDeque::new(),
            current_index: 0,
            max_size,
        }
    }

    /// Record an already-executed command, discarding any redo history
    pub fn push(&mut self, command: Command) {
        self.commands.truncate(self.current_index);
        self.commands.push_back(command);
        self.current_index = self.commands.len();

        while self.commands.len() > self.max_size {
            self.commands.pop_front();
            self.current_index = self.current_index.saturating_sub(1);
        }
    }

    /// Undo the last command, returning it
    pub fn undo(&mut self, notes: &mut Vec<Note>) -> Result<Command, HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }

        let command = self.commands[self.current_index - 1].clone();
        command.undo(notes)?;
        self.current_index -= 1;
        Ok(command)
    }

    /// Redo the last undone command, returning it
    pub fn redo(&mut self, notes: &mut Vec<Note>) -> Result<Command, HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }

        let command = self.commands[self.current_index].clone();
        command.execute(notes)?;
        self.current_index += 1;
        Ok(command)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.current_index < self.commands.len()
    }

    /// Clear all undo history
    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_index = 0;
    }

    /// Get the number of available undo steps
    pub fn undo_count(&self) -> usize {
        self.current_index
    }

    /// Get the number of available redo steps
    pub fn redo_count(&self) -> usize {
        self.commands.len() - self.current_index
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
