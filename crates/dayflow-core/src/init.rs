//! Day initialization records.
//!
//! Off days produce no timeline until the user manually starts the day;
//! the T-zero timestamp recorded here anchors all subsequent routine
//! placement for that date.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::time::Minutes;

/// Per-date initialization record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerInitialization {
    pub date: NaiveDate,
    /// Manual day-start timestamp; consumed on off days only.
    pub t_zero: DateTime<Local>,
    pub ended_at: Option<DateTime<Local>>,
}

impl PlannerInitialization {
    pub fn new(date: NaiveDate, t_zero: DateTime<Local>) -> Self {
        PlannerInitialization {
            date,
            t_zero,
            ended_at: None,
        }
    }

    /// T-zero as a minute-of-day offset for the engine.
    pub fn t_zero_minutes(&self) -> Minutes {
        Minutes::from_clock(&self.t_zero)
    }
}
