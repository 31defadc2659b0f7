//! JavaScript-facing API for the sequencing engine
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros, serialization and error conversion
//! - `sequence`: the loaded sequence and every editing/navigation call on it

pub mod helpers;
pub mod sequence;

pub use sequence::*;
