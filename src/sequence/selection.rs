//! Cursor, selection flags and navigation
//!
//! At most one note is selected at a time and it is always the note under the
//! cursor. Its tie fragments mirror its selection flag.

use crate::error::Result;
use crate::models::Note;

use super::NoteSequence;

impl NoteSequence {
    pub fn is_note_selected(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.cursor
    }

    /// The note under the cursor, if any
    pub fn selected_note(&self) -> Option<&Note> {
        self.cursor.and_then(|i| self.notes.get(i))
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.cursor == Some(index)
    }

    /// Select the note at `index`, deselecting the previous one
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if let Some(previous) = self.cursor.filter(|&c| c != index) {
            self.set_note_selected(previous, false);
        }
        self.set_note_selected(index, true);
        self.cursor = Some(index);
        Ok(())
    }

    /// Deselect the note at `index`; a no-op unless it is under the cursor
    pub fn deselect(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if self.cursor == Some(index) {
            self.set_note_selected(index, false);
            self.cursor = None;
        }
        Ok(())
    }

    pub fn deselect_all(&mut self) {
        self.place_cursor(None);
    }

    /// Toggle selection of the note at `index`
    pub fn click(&mut self, index: usize) -> Result<()> {
        if self.is_selected(index) {
            self.deselect(index)
        } else {
            self.select(index)
        }
    }

    pub fn select_first(&mut self) {
        if !self.notes.is_empty() {
            self.move_cursor(0);
        }
    }

    pub fn select_last(&mut self) {
        if let Some(last) = self.notes.len().checked_sub(1) {
            self.move_cursor(last);
        }
    }

    /// Move to the next note, wrapping to the first
    pub fn select_next(&mut self) {
        if let Some(current) = self.cursor {
            let next = (current + 1) % self.notes.len();
            self.move_cursor(next);
        }
    }

    /// Move to the previous note, wrapping to the last
    pub fn select_prev(&mut self) {
        if let Some(current) = self.cursor {
            let len = self.notes.len();
            self.move_cursor((current + len - 1) % len);
        }
    }

    /// Bar holding the cursor.
    ///
    /// A split note belongs to the bar its end fragments open, since that bar
    /// records the note as its `start_index`. Taking the first bar holding the
    /// note instead would keep `select_next_bar` on the same note.
    pub fn current_bar_index(&self) -> Option<usize> {
        let cursor = self.cursor?;
        self.bars.iter().rposition(|bar| bar.start_index <= cursor)
    }

    /// Move to the first note of the next bar, wrapping to the first bar
    pub fn select_next_bar(&mut self) {
        if let Some(current) = self.current_bar_index() {
            let next = (current + 1) % self.bars.len();
            self.move_cursor(self.bars[next].start_index);
        }
    }

    /// Move to the first note of the previous bar, wrapping to the last bar
    pub fn select_prev_bar(&mut self) {
        if let Some(current) = self.current_bar_index() {
            let len = self.bars.len();
            let prev = (current + len - 1) % len;
            self.move_cursor(self.bars[prev].start_index);
        }
    }

    fn move_cursor(&mut self, index: usize) {
        if let Err(err) = self.select(index) {
            log::warn!("cursor move to {} failed: {}", index, err);
        }
    }

    fn set_note_selected(&mut self, index: usize, selected: bool) {
        if let Some(note) = self.notes.get_mut(index) {
            note.is_selected = selected;
            if let Some(pair) = note.tie() {
                self.ties.set_selected(pair, selected);
            }
        }
    }

    /// Reset every selection flag and put the cursor at `cursor`
    pub(crate) fn place_cursor(&mut self, cursor: Option<usize>) {
        for note in &mut self.notes {
            note.is_selected = false;
        }
        self.ties.clear_selection();

        self.cursor = cursor.filter(|&i| i < self.notes.len());
        if let Some(index) = self.cursor {
            self.set_note_selected(index, true);
        }
    }
}
