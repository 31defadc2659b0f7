//! Notation Sequencer WASM Module
//!
//! Sequencing engine for a note editor: exact duration arithmetic, partitioning
//! of a note stream into 4/4 bars with tied fragments across bar lines, a
//! single-note cursor with bar navigation, and undo/redo over every edit.

pub mod api;
pub mod error;
pub mod models;
pub mod sequence;
pub mod undo;

// Re-export commonly used types
pub use error::{DurationError, HistoryError, PitchError, Result, SequenceError};
pub use models::*;
pub use sequence::{BarView, LayoutView, NoteSequence, NoteView};
pub use undo::{Command, UndoStack};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        crate::wasm_warn!("logger already initialised: {}", err);
    }

    log::info!("Notation sequencer WASM module initialized");
}
