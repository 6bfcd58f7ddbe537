//! Recurrence rules and per-date occurrence expansion.
//!
//! Stored recurrence configs come in two generations: the modern shape with
//! a `type` string (`daily`, `work_days`, `off_days`, `custom`) and the
//! legacy shift-relative shape that only carried a `target` of
//! `on_days`/`off_days`. Both are normalized into [`Recurrence`] exactly
//! once at read time; nothing downstream ever inspects the raw fields.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::task::Task;
use crate::time::Minutes;

/// Raw recurrence config as persisted. Unrecognized shapes normalize to
/// [`RecurrenceRule::None`] rather than failing the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceConfig {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Legacy shift-relative target: `on_days` or `off_days`.
    #[serde(default)]
    pub target: Option<String>,
    /// Weekday numbers for `custom` rules, Sunday = 0 .. Saturday = 6.
    #[serde(default)]
    pub days_of_week: Option<Vec<u8>>,
    /// Fixed placement time for the expanded occurrence.
    #[serde(default)]
    pub planner_time: Option<Minutes>,
    /// Duration override for the expanded occurrence, in minutes.
    #[serde(default)]
    pub planner_duration: Option<u32>,
}

impl RecurrenceConfig {
    /// Normalize into the tagged union consumed by the planner.
    pub fn normalize(&self) -> Recurrence {
        let rule = match self.kind.as_deref() {
            Some("daily") => RecurrenceRule::Daily,
            Some("work_days") => RecurrenceRule::WorkDays,
            Some("off_days") => RecurrenceRule::OffDays,
            Some("custom") => match self.days_of_week.as_deref() {
                Some(days) if !days.is_empty() => {
                    RecurrenceRule::Custom(WeekdaySet::from_numbers(days))
                }
                _ => RecurrenceRule::None,
            },
            // Legacy rows: `shift_relative` kind, or no kind at all with a
            // bare target.
            Some("shift_relative") | None => match self.target.as_deref() {
                Some("on_days") => RecurrenceRule::WorkDays,
                Some("off_days") => RecurrenceRule::OffDays,
                _ => RecurrenceRule::None,
            },
            Some(_) => RecurrenceRule::None,
        };
        Recurrence {
            rule,
            planner_time: self.planner_time,
            planner_duration: self.planner_duration,
        }
    }
}

/// Normalized recurrence: the rule plus optional fixed planner placement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Recurrence {
    pub rule: RecurrenceRule,
    pub planner_time: Option<Minutes>,
    pub planner_duration: Option<u32>,
}

impl Recurrence {
    pub fn is_recurring(&self) -> bool {
        !matches!(self.rule, RecurrenceRule::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecurrenceRule {
    #[default]
    None,
    Daily,
    WorkDays,
    OffDays,
    Custom(WeekdaySet),
}

/// Set of weekdays, Sunday = 0 .. Saturday = 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn from_numbers(days: &[u8]) -> Self {
        let mut mask = 0u8;
        for d in days {
            mask |= 1 << (d % 7);
        }
        WeekdaySet(mask)
    }

    pub fn contains(self, day: u8) -> bool {
        self.0 & (1 << (day % 7)) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Weekday number of a date, Sunday = 0 .. Saturday = 6.
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Whether a task occupies the given date.
///
/// An active recurrence rule wins over due-date placement. Without one, a
/// task is active when its due date matches under `on` mode; any other
/// mode, or no due date at all, is permissively active so undated backlog
/// items stay schedulable.
pub fn active_on(task: &Task, date: NaiveDate, is_work_day: bool) -> bool {
    use crate::task::DueDateMode;

    let recurrence = task.recurrence();
    match recurrence.rule {
        RecurrenceRule::None => {
            task.due_date_mode != DueDateMode::On
                || task.due_date.map_or(true, |due| due == date)
        }
        RecurrenceRule::Daily => true,
        RecurrenceRule::WorkDays => is_work_day,
        RecurrenceRule::OffDays => !is_work_day,
        RecurrenceRule::Custom(set) => set.contains(weekday_number(date)),
    }
}

/// Expand a task into its occurrence for the date, if it has one.
///
/// Recurring tasks come back as a virtual copy carrying the composite
/// `"{id}-{date}"` identity, the planner placement overrides, and a clean
/// completion flag (the base record's completion belongs to no particular
/// date). Non-recurring tasks come back as-is.
pub fn occurrence_for(task: &Task, date: NaiveDate, is_work_day: bool) -> Option<Task> {
    if !active_on(task, date, is_work_day) {
        return None;
    }
    let recurrence = task.recurrence();
    if !recurrence.is_recurring() {
        return Some(task.clone());
    }
    let mut occurrence = task.clone();
    occurrence.id = occurrence_id(&task.id, date);
    occurrence.is_completed = false;
    if recurrence.planner_time.is_some() {
        occurrence.start_time = recurrence.planner_time;
    }
    if recurrence.planner_duration.is_some() {
        occurrence.estimated_duration = recurrence.planner_duration;
    }
    Some(occurrence)
}

/// Composite identity of a recurring task's occurrence on a date.
pub fn occurrence_id(base_id: &str, date: NaiveDate) -> String {
    format!("{base_id}-{}", date.format("%Y-%m-%d"))
}

/// Recover the stored task id from an occurrence id by stripping a
/// trailing `-YYYY-MM-DD` suffix, if one is present.
pub fn base_task_id(id: &str) -> &str {
    const SUFFIX_LEN: usize = 11; // "-YYYY-MM-DD"
    if id.len() > SUFFIX_LEN && id.is_char_boundary(id.len() - SUFFIX_LEN) {
        let (base, suffix) = id.split_at(id.len() - SUFFIX_LEN);
        if let Some(date) = suffix.strip_prefix('-') {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
                return base;
            }
        }
    }
    id
}
