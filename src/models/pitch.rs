//! Natural pitches on the ascending C-major scale
//!
//! A pitch is a scale step (C..B) plus an octave. Stepping wraps the octave at
//! B/C and stops at the instrument range C1..=C8.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PitchError;

/// Ascending whole-note scale, index = scale step
pub const ASCENDING_SCALE: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

pub const LOWEST_OCTAVE: u8 = 1;
pub const HIGHEST_OCTAVE: u8 = 8;

/// Pitch letter and octave, e.g. E4
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPitch", into = "RawPitch")]
pub struct Pitch {
    /// Octave number (4 = middle C octave); ordered first so `Ord` is ascending pitch
    octave: u8,
    /// Scale step (0=C, 1=D, ..., 6=B)
    step: u8,
}

impl Pitch {
    pub const LOWEST: Pitch = Pitch {
        octave: LOWEST_OCTAVE,
        step: 0,
    };
    pub const HIGHEST: Pitch = Pitch {
        octave: HIGHEST_OCTAVE,
        step: 0,
    };

    /// Create a pitch with range validation
    pub fn new(step: u8, octave: u8) -> Result<Self, PitchError> {
        if step as usize >= ASCENDING_SCALE.len() {
            return Err(PitchError::Invalid(format!("step {} (must be 0-6)", step)));
        }
        let pitch = Pitch { octave, step };
        if pitch < Pitch::LOWEST || pitch > Pitch::HIGHEST {
            return Err(PitchError::Invalid(format!("{} is outside C1..C8", pitch)));
        }
        Ok(pitch)
    }

    /// Parse a letter + octave name such as `"E4"`
    pub fn parse(name: &str) -> Result<Self, PitchError> {
        let invalid = || PitchError::Invalid(name.to_string());

        let mut chars = name.chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let octave_str = chars.as_str();
        if octave_str.len() != 1 {
            return Err(invalid());
        }
        let octave = octave_str
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(invalid)?;
        let step = ASCENDING_SCALE
            .iter()
            .position(|&c| c == letter)
            .ok_or_else(invalid)?;

        Pitch::new(step as u8, octave as u8).map_err(|_| invalid())
    }

    pub fn letter(&self) -> char {
        ASCENDING_SCALE[self.step as usize]
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    pub fn is_highest(&self) -> bool {
        *self == Pitch::HIGHEST
    }

    pub fn is_lowest(&self) -> bool {
        *self == Pitch::LOWEST
    }

    /// Next scale step up, or `None` at C8
    pub fn incremented(&self) -> Option<Pitch> {
        if self.is_highest() {
            return None;
        }
        let last_step = ASCENDING_SCALE.len() as u8 - 1;
        Some(if self.step == last_step {
            Pitch {
                octave: self.octave + 1,
                step: 0,
            }
        } else {
            Pitch {
                octave: self.octave,
                step: self.step + 1,
            }
        })
    }

    /// Next scale step down, or `None` at C1
    pub fn decremented(&self) -> Option<Pitch> {
        if self.is_lowest() {
            return None;
        }
        Some(if self.step == 0 {
            Pitch {
                octave: self.octave - 1,
                step: ASCENDING_SCALE.len() as u8 - 1,
            }
        } else {
            Pitch {
                octave: self.octave,
                step: self.step - 1,
            }
        })
    }
}

/// Serialized shape of a pitch; range-checked on the way back in
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RawPitch {
    octave: u8,
    step: u8,
}

impl TryFrom<RawPitch> for Pitch {
    type Error = PitchError;

    fn try_from(raw: RawPitch) -> Result<Self, Self::Error> {
        Pitch::new(raw.step, raw.octave)
    }
}

impl From<Pitch> for RawPitch {
    fn from(pitch: Pitch) -> Self {
        RawPitch {
            octave: pitch.octave,
            step: pitch.step,
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter(), self.octave)
    }
}

impl FromStr for Pitch {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pitch::parse(s)
    }
}
