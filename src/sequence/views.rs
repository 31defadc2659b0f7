//! Serializable snapshots of the bar partition for the rendering layer

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::models::{Bar, BarEntry, BarSlot};

use super::NoteSequence;

/// A note or tie fragment as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView {
    /// Index of the note (or of the note a fragment was split from)
    pub index: usize,
    pub name: String,
    pub duration: String,
    pub is_note: bool,
    pub is_selected: bool,
    /// Fragment ties forward into the next bar
    pub is_tie_start: bool,
    /// Fragment continues a tie from the previous bar
    pub is_tie_end: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutView {
    pub note: NoteView,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarView {
    pub start_index: usize,
    pub positions_required: u32,
    pub sixteenths: u32,
    pub is_full: bool,
    pub notes: Vec<LayoutView>,
}

impl NoteSequence {
    /// Resolve a bar entry to the note or fragment it refers to
    pub fn entry_view(&self, entry: &BarEntry) -> Option<NoteView> {
        match entry.slot {
            BarSlot::Note(index) => {
                let note = self.notes.get(index)?;
                Some(NoteView {
                    index,
                    name: note.name(),
                    duration: note.duration.to_string(),
                    is_note: note.is_note,
                    is_selected: note.is_selected,
                    is_tie_start: false,
                    is_tie_end: false,
                })
            }
            BarSlot::Tie(id) => {
                let fragment = self.ties.get(id)?;
                Some(NoteView {
                    index: fragment.source,
                    name: fragment.name(),
                    duration: fragment.duration.to_string(),
                    is_note: fragment.is_note,
                    is_selected: fragment.is_selected,
                    is_tie_start: fragment.end_tie.is_some(),
                    is_tie_end: fragment.start_tie.is_some(),
                })
            }
        }
    }

    fn bar_view(&self, bar: &Bar) -> BarView {
        let positions_required = bar.positions_required();
        let notes = bar
            .layouts(positions_required)
            .into_iter()
            .filter_map(|layout| {
                Some(LayoutView {
                    note: self.entry_view(&layout.entry)?,
                    position: layout.position.to_f64()?,
                })
            })
            .collect();

        BarView {
            start_index: bar.start_index,
            positions_required,
            sixteenths: bar.sixteenths(),
            is_full: bar.is_full(),
            notes,
        }
    }

    pub fn bar_views(&self) -> Vec<BarView> {
        self.bars.iter().map(|bar| self.bar_view(bar)).collect()
    }
}
