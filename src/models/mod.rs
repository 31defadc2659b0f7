//! Models module for the notation sequencer
//!
//! Value types shared by the sequence, the undo history and the WASM API.

pub mod bar;
pub mod duration;
pub mod note;
pub mod pitch;
pub mod settings;
pub mod tie;

// Re-export commonly used types
pub use bar::{Bar, BarEntry, BarSlot, Layout, Timed, SIXTEENTHS_CAPACITY};
pub use duration::{notes_for_sixteenths, BaseDuration, Duration};
pub use note::{Note, NoteRecord, REST_NAME};
pub use pitch::Pitch;
pub use settings::EditorSettings;
pub use tie::{TieArena, TieFragment, TieId, TiePair};
