//! Symbolic note durations and sixteenth-count arithmetic
//!
//! A `Duration` is a base note value (whole through sixteenth) with an optional
//! dot. Everything downstream (bar filling, tie splitting, layout) works in
//! integer sixteenths; `as_fraction` gives the exact share of a 4/4 bar.
//!
//! Exchange notation follows the editor's persisted format: `1n 2n 4n 8n 16n`,
//! with a trailing `.` for a dotted value (`"8n."`).

use std::fmt;
use std::str::FromStr;

use num_rational::Rational32;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::error::DurationError;

/// Sixteenths in one whole note (and in one bar)
pub const SIXTEENTHS_PER_WHOLE: u32 = 16;

/// Undotted note value, encoded as its note-value denominator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum BaseDuration {
    Whole = 1,
    Half = 2,
    Quarter = 4,
    Eighth = 8,
    Sixteenth = 16,
}

impl BaseDuration {
    /// All bases, longest first
    pub const ALL: [BaseDuration; 5] = [
        BaseDuration::Whole,
        BaseDuration::Half,
        BaseDuration::Quarter,
        BaseDuration::Eighth,
        BaseDuration::Sixteenth,
    ];

    /// Note-value denominator (1 = whole, 4 = quarter, ...)
    pub const fn denominator(self) -> u32 {
        self as u32
    }

    pub const fn sixteenths(self) -> u32 {
        SIXTEENTHS_PER_WHOLE / self.denominator()
    }

    /// Next longer base, if any
    pub const fn longer(self) -> Option<BaseDuration> {
        match self {
            BaseDuration::Whole => None,
            BaseDuration::Half => Some(BaseDuration::Whole),
            BaseDuration::Quarter => Some(BaseDuration::Half),
            BaseDuration::Eighth => Some(BaseDuration::Quarter),
            BaseDuration::Sixteenth => Some(BaseDuration::Eighth),
        }
    }

    /// Next shorter base, if any
    pub const fn shorter(self) -> Option<BaseDuration> {
        match self {
            BaseDuration::Whole => Some(BaseDuration::Half),
            BaseDuration::Half => Some(BaseDuration::Quarter),
            BaseDuration::Quarter => Some(BaseDuration::Eighth),
            BaseDuration::Eighth => Some(BaseDuration::Sixteenth),
            BaseDuration::Sixteenth => None,
        }
    }

    /// Whole and sixteenth bases never carry a dot
    pub const fn can_be_dotted(self) -> bool {
        !matches!(self, BaseDuration::Whole | BaseDuration::Sixteenth)
    }

    fn from_denominator(denominator: u32) -> Option<BaseDuration> {
        BaseDuration::ALL
            .into_iter()
            .find(|base| base.denominator() == denominator)
    }
}

/// A base note value plus an optional dot.
///
/// Construction keeps the invariant that only half, quarter and eighth bases
/// are dotted, so `to_sixteenths` is always one of `16 12 8 6 4 3 2 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDuration", into = "RawDuration")]
pub struct Duration {
    base: BaseDuration,
    dotted: bool,
}

/// Serialized shape of a duration; validated on the way back in
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RawDuration {
    base: BaseDuration,
    #[serde(default)]
    dotted: bool,
}

impl TryFrom<RawDuration> for Duration {
    type Error = DurationError;

    fn try_from(raw: RawDuration) -> Result<Self, Self::Error> {
        if raw.dotted {
            Duration::dotted(raw.base)
        } else {
            Ok(Duration::new(raw.base))
        }
    }
}

impl From<Duration> for RawDuration {
    fn from(duration: Duration) -> Self {
        RawDuration {
            base: duration.base,
            dotted: duration.dotted,
        }
    }
}

/// Every legal duration, longest first. Drives `notes_for_sixteenths`.
pub const CANONICAL_DURATIONS: [Duration; 8] = [
    Duration::WHOLE,
    Duration::DOTTED_HALF,
    Duration::HALF,
    Duration::DOTTED_QUARTER,
    Duration::QUARTER,
    Duration::DOTTED_EIGHTH,
    Duration::EIGHTH,
    Duration::SIXTEENTH,
];

impl Duration {
    pub const WHOLE: Duration = Duration::new(BaseDuration::Whole);
    pub const HALF: Duration = Duration::new(BaseDuration::Half);
    pub const QUARTER: Duration = Duration::new(BaseDuration::Quarter);
    pub const EIGHTH: Duration = Duration::new(BaseDuration::Eighth);
    pub const SIXTEENTH: Duration = Duration::new(BaseDuration::Sixteenth);

    pub const DOTTED_HALF: Duration = Duration {
        base: BaseDuration::Half,
        dotted: true,
    };
    pub const DOTTED_QUARTER: Duration = Duration {
        base: BaseDuration::Quarter,
        dotted: true,
    };
    pub const DOTTED_EIGHTH: Duration = Duration {
        base: BaseDuration::Eighth,
        dotted: true,
    };

    /// Undotted duration of the given base
    pub const fn new(base: BaseDuration) -> Self {
        Duration { base, dotted: false }
    }

    /// Dotted duration; rejected for whole and sixteenth bases
    pub fn dotted(base: BaseDuration) -> Result<Self, DurationError> {
        if base.can_be_dotted() {
            Ok(Duration { base, dotted: true })
        } else {
            Err(DurationError::Invalid(format!("{}n.", base.denominator())))
        }
    }

    pub const fn base(&self) -> BaseDuration {
        self.base
    }

    pub const fn is_dotted(&self) -> bool {
        self.dotted
    }

    pub const fn to_sixteenths(&self) -> u32 {
        let base = self.base.sixteenths();
        if self.dotted {
            base + base / 2
        } else {
            base
        }
    }

    /// Half the base value: the largest proper sub-duration of a dotted note.
    ///
    /// Used for the layout grid, where a dotted quarter needs eighth resolution.
    pub const fn dotted_sixteenths(&self) -> u32 {
        self.base.sixteenths() / 2
    }

    pub const fn is_whole_base(&self) -> bool {
        matches!(self.base, BaseDuration::Whole)
    }

    pub const fn is_half_base(&self) -> bool {
        matches!(self.base, BaseDuration::Half)
    }

    pub const fn is_quarter_base(&self) -> bool {
        matches!(self.base, BaseDuration::Quarter)
    }

    pub const fn is_eighth_base(&self) -> bool {
        matches!(self.base, BaseDuration::Eighth)
    }

    pub const fn is_sixteenth_base(&self) -> bool {
        matches!(self.base, BaseDuration::Sixteenth)
    }

    /// Add or remove the dot. Whole and sixteenth bases are returned unchanged.
    pub fn toggle_dot(&self) -> Duration {
        if !self.base.can_be_dotted() {
            return *self;
        }
        Duration {
            base: self.base,
            dotted: !self.dotted,
        }
    }

    /// One base step longer, keeping the dot
    pub fn double(&self) -> Result<Duration, DurationError> {
        self.base
            .longer()
            .filter(|base| !self.dotted || base.can_be_dotted())
            .map(|base| Duration {
                base,
                dotted: self.dotted,
            })
            .ok_or(DurationError::OutOfRange {
                duration: *self,
                op: "double",
            })
    }

    /// One base step shorter, keeping the dot
    pub fn halve(&self) -> Result<Duration, DurationError> {
        self.base
            .shorter()
            .filter(|base| !self.dotted || base.can_be_dotted())
            .map(|base| Duration {
                base,
                dotted: self.dotted,
            })
            .ok_or(DurationError::OutOfRange {
                duration: *self,
                op: "halve",
            })
    }

    /// Exact share of a whole note (1/4 for a quarter, 3/8 for a dotted quarter)
    pub fn as_fraction(&self) -> Rational32 {
        Rational32::new(self.to_sixteenths() as i32, SIXTEENTHS_PER_WHOLE as i32)
    }

    /// The single legal duration lasting exactly `sixteenths`, if there is one
    pub fn from_sixteenths(sixteenths: u32) -> Option<Duration> {
        CANONICAL_DURATIONS
            .into_iter()
            .find(|d| d.to_sixteenths() == sixteenths)
    }
}

/// Decompose a sixteenth count into legal durations, longest first.
///
/// Greedy over `CANONICAL_DURATIONS`: `12 -> [2n.]`, `7 -> [4n., 16n]`,
/// `20 -> [1n, 4n]`, `0 -> []`. Because every count 1..=16 is either a legal
/// duration or the sum of two, the greedy result is also the shortest one.
pub fn notes_for_sixteenths(sixteenths: u32) -> Vec<Duration> {
    let mut remaining = sixteenths;
    let mut durations = Vec::new();

    while remaining > 0 {
        let Some(next) = CANONICAL_DURATIONS
            .into_iter()
            .find(|d| d.to_sixteenths() <= remaining)
        else {
            break;
        };
        remaining -= next.to_sixteenths();
        durations.push(next);
    }

    durations
}

/// Total sixteenths of a run of durations
pub fn total_sixteenths<'a>(durations: impl IntoIterator<Item = &'a Duration>) -> u32 {
    durations.into_iter().map(Duration::to_sixteenths).sum()
}

impl Default for Duration {
    fn default() -> Self {
        Duration::QUARTER
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}n", self.base.denominator())?;
        if self.dotted {
            write!(f, ".")?;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationError::Invalid(s.to_string());

        let (body, dotted) = match s.strip_suffix('.') {
            Some(body) => (body, true),
            None => (s, false),
        };
        let digits = body.strip_suffix('n').ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let denominator: u32 = digits.parse().map_err(|_| invalid())?;
        let base = BaseDuration::from_denominator(denominator).ok_or_else(invalid)?;

        if dotted {
            Duration::dotted(base).map_err(|_| invalid())
        } else {
            Ok(Duration::new(base))
        }
    }
}

impl Duration {
    /// Parse exchange notation (`"4n"`, `"8n."`)
    pub fn parse(s: &str) -> Result<Self, DurationError> {
        s.parse()
    }
}
