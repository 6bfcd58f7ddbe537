//! Task model: the flexible-work backlog the planner schedules.

pub mod recurrence;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use recurrence::{
    active_on, base_task_id, occurrence_for, occurrence_id, Recurrence, RecurrenceConfig,
    RecurrenceRule, WeekdaySet,
};

use crate::time::Minutes;

/// Duration assumed for tasks without an estimate, in minutes.
pub const DEFAULT_TASK_MINUTES: u32 = 30;

/// Five-tier priority. Storage historically named only the lower four;
/// `urgent` sits above them and is what Flow Mode and Chill Mode gate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    Super,
    High,
    Mid,
    #[default]
    Low,
}

impl Priority {
    /// Scheduling weight, higher schedules earlier.
    pub fn weight(self) -> u8 {
        match self {
            Priority::Urgent => 5,
            Priority::Super => 4,
            Priority::High => 3,
            Priority::Mid => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Super => "super",
            Priority::High => "high",
            Priority::Mid => "mid",
            Priority::Low => "low",
        }
    }
}

/// Owning namespace of a task. A partition key only; both profiles are
/// pooled for scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Personal,
    Business,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Personal => "personal",
            Profile::Business => "business",
        }
    }
}

/// Category of a task. Groceries and reminders never enter the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    #[default]
    Todo,
    Grocery,
    Reminder,
}

impl TaskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Todo => "todo",
            TaskCategory::Grocery => "grocery",
            TaskCategory::Reminder => "reminder",
        }
    }
}

/// Soft strategic tag; gates evening scheduling on work days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategicCategory {
    Finance,
    Career,
    Health,
    Personal,
}

impl StrategicCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategicCategory::Finance => "finance",
            StrategicCategory::Career => "career",
            StrategicCategory::Health => "health",
            StrategicCategory::Personal => "personal",
        }
    }
}

/// How a due date constrains placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DueDateMode {
    #[default]
    On,
    Before,
    Range,
}

/// Hard deadlines bypass the Flow Mode filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineType {
    #[default]
    Soft,
    Hard,
}

/// A unit of flexible work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub profile: Profile,
    pub title: String,
    pub category: TaskCategory,
    pub priority: Priority,
    #[serde(default)]
    pub strategic_category: Option<StrategicCategory>,
    /// Minutes; `None` means [`DEFAULT_TASK_MINUTES`].
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    /// Dominant tie-break within a priority tier; `None` counts as 0.
    #[serde(default)]
    pub impact_score: Option<i32>,
    #[serde(default)]
    pub travel_to_duration: Option<u32>,
    #[serde(default)]
    pub travel_from_duration: Option<u32>,
    /// Fixed appointment time. Overrides the computed placement but does
    /// not reorder already-placed items.
    #[serde(default)]
    pub start_time: Option<Minutes>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date_mode: DueDateMode,
    /// Range end when `due_date_mode` is `range`.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub deadline_type: DeadlineType,
    #[serde(default)]
    pub recurrence: Option<RecurrenceConfig>,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a task with default scheduling attributes.
    pub fn new(title: impl Into<String>, profile: Profile, category: TaskCategory) -> Self {
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            profile,
            title: title.into(),
            category,
            priority: Priority::default(),
            strategic_category: None,
            estimated_duration: None,
            impact_score: None,
            travel_to_duration: None,
            travel_from_duration: None,
            start_time: None,
            location: None,
            due_date: None,
            due_date_mode: DueDateMode::default(),
            end_date: None,
            deadline_type: DeadlineType::default(),
            recurrence: None,
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.estimated_duration.unwrap_or(DEFAULT_TASK_MINUTES)
    }

    pub fn impact(&self) -> i32 {
        self.impact_score.unwrap_or(0)
    }

    pub fn travel_to(&self) -> u32 {
        self.travel_to_duration.unwrap_or(0)
    }

    pub fn travel_from(&self) -> u32 {
        self.travel_from_duration.unwrap_or(0)
    }

    /// Normalized recurrence; absent config means no recurrence.
    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
            .as_ref()
            .map(RecurrenceConfig::normalize)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_weights_are_strictly_ordered() {
        let tiers = [
            Priority::Urgent,
            Priority::Super,
            Priority::High,
            Priority::Mid,
            Priority::Low,
        ];
        for pair in tiers.windows(2) {
            assert!(pair[0].weight() > pair[1].weight());
        }
    }

    #[test]
    fn defaults_fill_absent_fields() {
        let task = Task::new("write report", Profile::Business, TaskCategory::Todo);
        assert_eq!(task.duration_minutes(), DEFAULT_TASK_MINUTES);
        assert_eq!(task.impact(), 0);
        assert_eq!(task.travel_to(), 0);
        assert_eq!(task.travel_from(), 0);
        assert_eq!(task.recurrence().rule, RecurrenceRule::None);
    }

    #[test]
    fn task_serialization_roundtrip() {
        let mut task = Task::new("deep work", Profile::Personal, TaskCategory::Todo);
        task.priority = Priority::Urgent;
        task.strategic_category = Some(StrategicCategory::Career);
        task.start_time = Some(Minutes::from_hm(14, 30));
        task.recurrence = Some(RecurrenceConfig {
            kind: Some("custom".to_string()),
            days_of_week: Some(vec![1, 3, 5]),
            ..Default::default()
        });

        let json = serde_json::to_string(&task).unwrap();
        let decoded: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, task);
    }

    #[test]
    fn priority_serde_names_stay_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::Super).unwrap(), "\"super\"");
        let p: Priority = serde_json::from_str("\"urgent\"").unwrap();
        assert_eq!(p, Priority::Urgent);
    }
}
