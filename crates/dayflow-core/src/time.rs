//! Day-relative time arithmetic.
//!
//! Planner times cross the process boundary as plain `HH:MM` wall-clock
//! strings, but all internal arithmetic runs on [`Minutes`]: an offset from
//! midnight of the planning day. The offset may exceed 24h, so a fill
//! pointer that walks past midnight keeps its chronological ordering
//! instead of wrapping back to the morning.

use std::fmt;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Wall-clock times at or before this offset count as "next day" when
/// compared against evening times: a block ending 00:20 comes after one
/// starting 23:30.
const OVERNIGHT_CUTOFF: i32 = 6 * 60;

/// Minute offset from midnight of the planning day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "String", into = "String")]
pub struct Minutes(i32);

impl Minutes {
    pub const fn new(offset: i32) -> Self {
        Minutes(offset)
    }

    pub const fn from_hm(hour: u32, minute: u32) -> Self {
        Minutes((hour * 60 + minute) as i32)
    }

    /// Parse an `HH:MM` literal.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTime(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Minutes::from_hm(hour, minute))
    }

    /// Minute-of-day of a clock reading (seconds discarded).
    pub fn from_clock<T: Timelike>(t: &T) -> Self {
        Minutes::from_hm(t.hour(), t.minute())
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    pub const fn add(self, minutes: i32) -> Self {
        Minutes(self.0 + minutes)
    }

    /// Offset folded into 0..1440 for display.
    pub const fn wrapped(self) -> i32 {
        self.0.rem_euclid(MINUTES_PER_DAY)
    }

    /// Ordering key that places early-morning times (00:00..=06:00) after
    /// evening ones. Used only where two wall-clock values must be compared
    /// across a possible midnight boundary; plain `Ord` is chronological
    /// for offsets produced by the fill pointer.
    pub const fn overnight_rank(self) -> i32 {
        let w = self.wrapped();
        if w <= OVERNIGHT_CUTOFF {
            w + MINUTES_PER_DAY
        } else {
            w
        }
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.wrapped();
        write!(f, "{:02}:{:02}", w / 60, w % 60)
    }
}

impl TryFrom<String> for Minutes {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Minutes::parse(&s)
    }
}

impl From<Minutes> for String {
    fn from(m: Minutes) -> Self {
        m.to_string()
    }
}
