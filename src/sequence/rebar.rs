//! Bar partitioning ("rebar") and tie splitting
//!
//! # Algorithm
//!
//! ```text
//! for each note:
//!   fits in current bar          → push
//!   bar exactly full             → close bar, open new bar with the note
//!   bar partly full, note too big → split: start fragments fill this bar,
//!                                   end fragments open the next one
//! ```
//!
//! The partition is recomputed from scratch after every edit; tie state on the
//! notes and the fragment arena are cleared first and never patched in place.

use crate::error::SequenceError;
use crate::models::duration::{notes_for_sixteenths, Duration};
use crate::models::{Bar, BarEntry, Note, TieArena, TieFragment, TieId, TiePair};

use super::NoteSequence;

fn alloc_fragments(
    note: &Note,
    source: usize,
    sixteenths: u32,
    arena: &mut TieArena,
) -> Vec<TieId> {
    notes_for_sixteenths(sixteenths)
        .into_iter()
        .map(|duration: Duration| {
            arena.alloc(TieFragment {
                source,
                pitch: note.pitch(),
                duration,
                is_note: note.is_note,
                is_selected: note.is_selected,
                start_tie: None,
                end_tie: None,
            })
        })
        .collect()
}

/// Split `note` so its start fills the `available` sixteenths left in a bar.
///
/// Start and end fragments are canonical decompositions of `available` and of
/// the excess. Only the last start fragment and the first end fragment are
/// tied together. Rejected when the note already fits or the bar has no room.
pub fn create_ties(
    note: &Note,
    source: usize,
    available: u32,
    arena: &mut TieArena,
) -> Result<TiePair, SequenceError> {
    let sixteenths = note.sixteenths();
    if available == 0 || available >= sixteenths {
        return Err(SequenceError::NoSplitNeeded {
            sixteenths,
            available,
        });
    }
    let excess = sixteenths - available;

    let start = alloc_fragments(note, source, available, arena);
    let end = alloc_fragments(note, source, excess, arena);
    if let (Some(&last_start), Some(&first_end)) = (start.last(), end.first()) {
        arena.link(last_start, first_end);
    }

    Ok(TiePair { start, end })
}

fn push_fragments(bar: &mut Bar, ids: &[TieId], arena: &TieArena) {
    for &id in ids {
        if let Some(fragment) = arena.get(id) {
            bar.push(BarEntry::tie(id, fragment.duration));
        }
    }
}

/// Partition `notes` into bars, splitting overflowing notes into ties.
///
/// Clears and refills `arena`, and resets every note's tie pair.
pub fn partition(notes: &mut [Note], arena: &mut TieArena) -> Vec<Bar> {
    arena.clear();

    let mut bars = Vec::new();
    let mut bar = Bar::new(0);

    for (i, note) in notes.iter_mut().enumerate() {
        note.clear_tie();
        let entry = BarEntry::note(i, note.duration);

        if bar.can_accommodate(&entry) {
            bar.push(entry);
            continue;
        }

        if bar.is_full() {
            bars.push(std::mem::replace(&mut bar, Bar::with_first(i, entry)));
            continue;
        }

        match create_ties(note, i, bar.sixteenths_available(), arena) {
            Ok(pair) => {
                push_fragments(&mut bar, &pair.start, arena);
                let mut next = Bar::new(i);
                push_fragments(&mut next, &pair.end, arena);
                bars.push(std::mem::replace(&mut bar, next));
                note.set_tie(pair);
            }
            Err(err) => {
                log::warn!("tie split at note {} failed: {}", i, err);
                bars.push(std::mem::replace(&mut bar, Bar::with_first(i, entry)));
            }
        }
    }

    if !bar.is_empty() {
        bars.push(bar);
    }

    bars
}

impl NoteSequence {
    /// Recompute bars and ties from the note list
    pub(crate) fn rebar(&mut self) {
        self.bars = partition(&mut self.notes, &mut self.ties);
        log::debug!(
            "rebar: {} notes, {} bars, {} tie fragments",
            self.notes.len(),
            self.bars.len(),
            self.ties.len()
        );
    }
}
