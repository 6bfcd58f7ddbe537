//! Shift rotation calendar and per-date overrides.
//!
//! The base rotation is a repeating N-on/M-off cycle anchored to a known
//! shift start date. Per-date overrides punch holes in it: holiday and
//! absence force an off day, overtime forces a work day.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Repeating on/off shift pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotaPattern {
    /// First day of an "on" run.
    pub anchor: NaiveDate,
    pub days_on: u32,
    pub days_off: u32,
}

impl Default for RotaPattern {
    fn default() -> Self {
        RotaPattern {
            anchor: default_anchor(),
            days_on: 3,
            days_off: 3,
        }
    }
}

fn default_anchor() -> NaiveDate {
    // 2026-02-23, the Monday the current rotation cycle started on.
    NaiveDate::from_ymd_opt(2026, 2, 23).expect("valid anchor date")
}

impl RotaPattern {
    /// Base answer from the cycle alone, before overrides. Dates before
    /// the anchor fall through the same arithmetic.
    pub fn is_base_work_day(&self, date: NaiveDate) -> bool {
        let cycle = (self.days_on + self.days_off) as i64;
        if cycle == 0 {
            return false;
        }
        let diff = (date - self.anchor).num_days();
        diff.rem_euclid(cycle) < self.days_on as i64
    }
}

/// Kind of per-date rota override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideKind {
    Holiday,
    Absence,
    Overtime,
}

impl OverrideKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OverrideKind::Holiday => "holiday",
            OverrideKind::Absence => "absence",
            OverrideKind::Overtime => "overtime",
        }
    }
}

/// A per-date exception to the base rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotaOverride {
    pub date: NaiveDate,
    pub kind: OverrideKind,
}

/// Rotation plus overrides; the single source of work-day truth.
#[derive(Debug, Clone, Default)]
pub struct WorkCalendar {
    pattern: RotaPattern,
    overrides: HashMap<NaiveDate, OverrideKind>,
}

impl WorkCalendar {
    pub fn new(pattern: RotaPattern) -> Self {
        WorkCalendar {
            pattern,
            overrides: HashMap::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = RotaOverride>) -> Self {
        self.overrides
            .extend(overrides.into_iter().map(|o| (o.date, o.kind)));
        self
    }

    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        match self.overrides.get(&date) {
            Some(OverrideKind::Holiday) | Some(OverrideKind::Absence) => false,
            Some(OverrideKind::Overtime) => true,
            None => self.pattern.is_base_work_day(date),
        }
    }

    /// Work days in the next `days` days starting from `from`.
    pub fn upcoming_work_days(&self, from: NaiveDate, days: u32) -> Vec<NaiveDate> {
        from.iter_days()
            .take(days as usize)
            .filter(|d| self.is_work_day(*d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn three_on_three_off_cycles_from_anchor() {
        let pattern = RotaPattern::default();
        // Anchor Monday starts an on-run: Mon/Tue/Wed on, Thu/Fri/Sat off.
        assert!(pattern.is_base_work_day(date(2026, 2, 23)));
        assert!(pattern.is_base_work_day(date(2026, 2, 25)));
        assert!(!pattern.is_base_work_day(date(2026, 2, 26)));
        assert!(!pattern.is_base_work_day(date(2026, 2, 28)));
        // Next cycle.
        assert!(pattern.is_base_work_day(date(2026, 3, 1)));
    }

    #[test]
    fn dates_before_anchor_follow_the_same_cycle() {
        let pattern = RotaPattern::default();
        // Three days before the anchor is the last off day of the prior run.
        assert!(!pattern.is_base_work_day(date(2026, 2, 22)));
        assert!(pattern.is_base_work_day(date(2026, 2, 20)));
    }

    #[test]
    fn overrides_trump_the_base_pattern() {
        let on_day = date(2026, 2, 23);
        let off_day = date(2026, 2, 26);
        let calendar = WorkCalendar::new(RotaPattern::default()).with_overrides([
            RotaOverride {
                date: on_day,
                kind: OverrideKind::Holiday,
            },
            RotaOverride {
                date: off_day,
                kind: OverrideKind::Overtime,
            },
        ]);
        assert!(!calendar.is_work_day(on_day));
        assert!(calendar.is_work_day(off_day));
        // Unrelated dates keep the base answer.
        assert!(calendar.is_work_day(date(2026, 2, 24)));
    }

    #[test]
    fn absence_forces_off_like_holiday() {
        let calendar = WorkCalendar::new(RotaPattern::default()).with_overrides([RotaOverride {
            date: date(2026, 2, 24),
            kind: OverrideKind::Absence,
        }]);
        assert!(!calendar.is_work_day(date(2026, 2, 24)));
    }

    #[test]
    fn upcoming_work_days_spans_the_window() {
        let calendar = WorkCalendar::new(RotaPattern::default());
        let days = calendar.upcoming_work_days(date(2026, 2, 23), 6);
        assert_eq!(
            days,
            vec![date(2026, 2, 23), date(2026, 2, 24), date(2026, 2, 25)]
        );
    }
}
