//! Tie fragments produced when a note is split across a bar line
//!
//! Fragments live in a per-sequence `TieArena` and refer to each other by
//! `TieId`, so a tie pair never needs mutual references. The arena is cleared
//! and refilled on every rebar; ids are only meaningful until the next one.

use serde::{Deserialize, Serialize};

use super::duration::Duration;
use super::note::REST_NAME;
use super::pitch::Pitch;

/// Index of a fragment inside a `TieArena`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TieId(usize);

impl TieId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One sounding piece of a split note
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TieFragment {
    /// Index of the originating note in the sequence
    pub source: usize,
    pub pitch: Option<Pitch>,
    pub duration: Duration,
    pub is_note: bool,
    pub is_selected: bool,
    /// Set on the first end fragment: the start fragment it continues
    pub start_tie: Option<TieId>,
    /// Set on the last start fragment: the end fragment it ties into
    pub end_tie: Option<TieId>,
}

impl TieFragment {
    pub fn name(&self) -> String {
        self.pitch
            .map(|p| p.to_string())
            .unwrap_or_else(|| REST_NAME.to_string())
    }

    pub fn sixteenths(&self) -> u32 {
        self.duration.to_sixteenths()
    }
}

/// The fragments a note was split into, in order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TiePair {
    /// Fragments filling the rest of the note's first bar
    pub start: Vec<TieId>,
    /// Fragments opening the following bar
    pub end: Vec<TieId>,
}

impl TiePair {
    pub fn ids(&self) -> impl Iterator<Item = TieId> + '_ {
        self.start.iter().chain(self.end.iter()).copied()
    }
}

/// Owning storage for all fragments of one sequence
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TieArena {
    fragments: Vec<TieFragment>,
}

impl TieArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    pub fn alloc(&mut self, fragment: TieFragment) -> TieId {
        self.fragments.push(fragment);
        TieId(self.fragments.len() - 1)
    }

    pub fn get(&self, id: TieId) -> Option<&TieFragment> {
        self.fragments.get(id.0)
    }

    pub fn get_mut(&mut self, id: TieId) -> Option<&mut TieFragment> {
        self.fragments.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TieId, &TieFragment)> {
        self.fragments
            .iter()
            .enumerate()
            .map(|(i, fragment)| (TieId(i), fragment))
    }

    /// Tie `start` into `end` in both directions
    pub fn link(&mut self, start: TieId, end: TieId) {
        if let Some(fragment) = self.get_mut(start) {
            fragment.end_tie = Some(end);
        }
        if let Some(fragment) = self.get_mut(end) {
            fragment.start_tie = Some(start);
        }
    }

    /// Mirror a note's selection onto its fragments
    pub fn set_selected(&mut self, pair: &TiePair, selected: bool) {
        for id in pair.ids() {
            if let Some(fragment) = self.get_mut(id) {
                fragment.is_selected = selected;
            }
        }
    }

    pub fn clear_selection(&mut self) {
        for fragment in &mut self.fragments {
            fragment.is_selected = false;
        }
    }

    pub fn total_sixteenths(&self, ids: &[TieId]) -> u32 {
        ids.iter()
            .filter_map(|&id| self.get(id))
            .map(TieFragment::sixteenths)
            .sum()
    }
}
