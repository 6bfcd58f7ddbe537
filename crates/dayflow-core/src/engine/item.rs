//! Timeline item types.

use serde::{Deserialize, Serialize};

use crate::task::{Priority, Profile, StrategicCategory};
use crate::time::Minutes;

/// Kind of timeline item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Routine,
    Task,
    Shift,
    Transit,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Task => "task",
            Self::Shift => "shift",
            Self::Transit => "transit",
        }
    }
}

/// Scheduling class: rigid anchor, flexible task, or filler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemClass {
    /// Rigid anchor with a fixed clock time.
    A,
    /// Flexible task placed by the engine.
    B,
    /// Filler: transit legs and recovery breaks.
    C,
}

/// A single entry on the synthesized timeline.
///
/// Recomputed fresh on every synthesis call and never mutated in place;
/// the only identity that survives across runs is the (derived) task id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: String,
    pub title: String,
    /// `None` renders as `--:--` (Chill Mode placeholder).
    pub time: Option<Minutes>,
    /// Minutes.
    pub duration: u32,
    pub end_time: Option<Minutes>,
    pub kind: ItemKind,
    pub class: ItemClass,
    #[serde(default)]
    pub is_completed: bool,
    /// Currently started via the active-task pointer.
    #[serde(default)]
    pub is_active: bool,
    /// "Now" falls within [time, time + duration).
    #[serde(default)]
    pub is_current: bool,
    /// Start time passed the grace window without the task being started.
    #[serde(default)]
    pub is_stalled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategic_category: Option<StrategicCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Tie-break among same-time items: pre-travel < task < post-travel
    /// and recovery.
    #[serde(skip)]
    pub(crate) precedence: u8,
}

impl TimelineItem {
    /// Create a scheduled item; `end_time` is derived.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        time: Minutes,
        duration: u32,
        kind: ItemKind,
        class: ItemClass,
    ) -> Self {
        TimelineItem {
            id: id.into(),
            title: title.into(),
            time: Some(time),
            duration,
            end_time: Some(time.add(duration as i32)),
            kind,
            class,
            is_completed: false,
            is_active: false,
            is_current: false,
            is_stalled: false,
            impact_score: None,
            location: None,
            profile: None,
            strategic_category: None,
            priority: None,
            precedence: 0,
        }
    }

    /// Create an item without a clock time (Chill Mode).
    pub fn unscheduled(
        id: impl Into<String>,
        title: impl Into<String>,
        duration: u32,
        kind: ItemKind,
        class: ItemClass,
    ) -> Self {
        TimelineItem {
            id: id.into(),
            title: title.into(),
            time: None,
            duration,
            end_time: None,
            kind,
            class,
            is_completed: false,
            is_active: false,
            is_current: false,
            is_stalled: false,
            impact_score: None,
            location: None,
            profile: None,
            strategic_category: None,
            priority: None,
            precedence: 0,
        }
    }

    pub(crate) fn with_precedence(mut self, precedence: u8) -> Self {
        self.precedence = precedence;
        self
    }

    /// Display label for the start time.
    pub fn time_label(&self) -> String {
        match self.time {
            Some(t) => t.to_string(),
            None => "--:--".to_string(),
        }
    }

    /// Whether two scheduled items overlap in time.
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self.time, self.end_time, other.time, other.end_time) {
            (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) => {
                a_start < b_end && a_end > b_start
            }
            _ => false,
        }
    }
}
