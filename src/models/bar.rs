//! Fixed-capacity bars (4/4 measures counted in sixteenths)
//!
//! A bar holds entries pointing either at a whole note of the owning sequence
//! or at a tie fragment of a split note. Capacity is always 16 sixteenths.

use num_rational::Rational32;
use serde::{Deserialize, Serialize};

use super::duration::{Duration, SIXTEENTHS_PER_WHOLE};
use super::note::Note;
use super::tie::{TieFragment, TieId};

/// Sixteenths one bar can hold
pub const SIXTEENTHS_CAPACITY: u32 = SIXTEENTHS_PER_WHOLE;

/// Anything that occupies time in a bar
pub trait Timed {
    fn duration(&self) -> Duration;

    fn sixteenths(&self) -> u32 {
        self.duration().to_sixteenths()
    }

    /// Finest subdivision this element needs on the layout grid
    fn grid_sixteenths(&self) -> u32 {
        let duration = self.duration();
        if duration.is_dotted() {
            duration.dotted_sixteenths()
        } else {
            duration.to_sixteenths()
        }
    }
}

impl Timed for Duration {
    fn duration(&self) -> Duration {
        *self
    }
}

impl Timed for Note {
    fn duration(&self) -> Duration {
        self.duration
    }
}

impl Timed for TieFragment {
    fn duration(&self) -> Duration {
        self.duration
    }
}

/// What a bar entry refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarSlot {
    /// Whole note at this sequence index
    Note(usize),
    /// Fragment of a split note
    Tie(TieId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarEntry {
    pub slot: BarSlot,
    pub duration: Duration,
}

impl BarEntry {
    pub fn note(index: usize, duration: Duration) -> Self {
        BarEntry {
            slot: BarSlot::Note(index),
            duration,
        }
    }

    pub fn tie(id: TieId, duration: Duration) -> Self {
        BarEntry {
            slot: BarSlot::Tie(id),
            duration,
        }
    }
}

impl Timed for BarEntry {
    fn duration(&self) -> Duration {
        self.duration
    }
}

/// An entry and its horizontal grid position (0-based, may be fractional)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub entry: BarEntry,
    pub position: Rational32,
}

/// One measure of the partitioned sequence
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bar {
    entries: Vec<BarEntry>,
    sixteenths: u32,
    /// Index in the sequence's note list of the first note starting in this bar
    pub start_index: usize,
}

impl Bar {
    pub fn new(start_index: usize) -> Self {
        Bar {
            entries: Vec::new(),
            sixteenths: 0,
            start_index,
        }
    }

    /// A bar opened at `start_index` holding `first`
    pub fn with_first(start_index: usize, first: BarEntry) -> Self {
        let mut bar = Bar::new(start_index);
        bar.push(first);
        bar
    }

    pub fn entries(&self) -> &[BarEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sixteenths consumed so far
    pub fn sixteenths(&self) -> u32 {
        self.sixteenths
    }

    /// Append an entry. The caller checks `can_accommodate` first.
    pub fn push(&mut self, entry: BarEntry) {
        if !self.can_accommodate(&entry) {
            log::warn!(
                "bar at {} overfilled: {} + {} sixteenths",
                self.start_index,
                self.sixteenths,
                entry.sixteenths()
            );
            debug_assert!(false, "pushed an entry that does not fit");
        }
        self.sixteenths += entry.sixteenths();
        self.entries.push(entry);
    }

    pub fn can_accommodate(&self, item: &impl Timed) -> bool {
        self.sixteenths + item.sixteenths() <= SIXTEENTHS_CAPACITY
    }

    pub fn sixteenths_available(&self) -> u32 {
        SIXTEENTHS_CAPACITY.saturating_sub(self.sixteenths)
    }

    pub fn is_full(&self) -> bool {
        self.sixteenths == SIXTEENTHS_CAPACITY
    }

    /// Grid positions needed to lay out every entry evenly.
    ///
    /// `16 / smallest increment`, where a dotted entry counts as half its base.
    pub fn positions_required(&self) -> u32 {
        let smallest = self
            .entries
            .iter()
            .map(Timed::grid_sixteenths)
            .min()
            .unwrap_or(SIXTEENTHS_CAPACITY)
            .max(1);
        SIXTEENTHS_CAPACITY / smallest
    }

    /// Position of each entry on a grid of `positions_required` slots
    pub fn layouts(&self, positions_required: u32) -> Vec<Layout> {
        let sixteenths_per_position =
            Rational32::new(SIXTEENTHS_CAPACITY as i32, positions_required.max(1) as i32);
        let mut position = Rational32::from_integer(0);

        self.entries
            .iter()
            .map(|entry| {
                let layout = Layout {
                    entry: *entry,
                    position,
                };
                position += Rational32::from_integer(entry.sixteenths() as i32) / sixteenths_per_position;
                layout
            })
            .collect()
    }

    /// `layouts` on this bar's own grid
    pub fn layouts_default(&self) -> Vec<Layout> {
        self.layouts(self.positions_required())
    }
}
