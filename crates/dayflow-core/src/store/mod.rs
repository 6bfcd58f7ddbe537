//! Collaborator contracts the planner depends on.
//!
//! The engine itself only ever sees plain values; these traits are the
//! suspension points where I/O can block or fail. [`crate::storage::PlannerDb`]
//! is the SQLite implementation; tests substitute in-memory or failing
//! doubles.

use chrono::{DateTime, Local, NaiveDate};

use crate::error::Result;
use crate::init::PlannerInitialization;
use crate::rota::RotaOverride;
use crate::settings::{DayPlannerSettings, SettingsPatch};
use crate::task::{Priority, Profile, RecurrenceConfig, StrategicCategory, Task, TaskCategory};
use crate::time::Minutes;

/// Partial task update; `None` leaves a field untouched, `Some(None)`
/// clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub impact_score: Option<Option<i32>>,
    pub estimated_duration: Option<Option<u32>>,
    pub start_time: Option<Option<Minutes>>,
    pub strategic_category: Option<Option<StrategicCategory>>,
    pub recurrence: Option<Option<RecurrenceConfig>>,
}

impl TaskPatch {
    pub fn completed(value: bool) -> Self {
        TaskPatch {
            is_completed: Some(value),
            ..Default::default()
        }
    }

    pub fn due(date: NaiveDate) -> Self {
        TaskPatch {
            due_date: Some(Some(date)),
            ..Default::default()
        }
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(v) = &self.title {
            task.title = v.clone();
        }
        if let Some(v) = self.is_completed {
            task.is_completed = v;
        }
        if let Some(v) = self.priority {
            task.priority = v;
        }
        if let Some(v) = self.due_date {
            task.due_date = v;
        }
        if let Some(v) = self.impact_score {
            task.impact_score = v;
        }
        if let Some(v) = self.estimated_duration {
            task.estimated_duration = v;
        }
        if let Some(v) = self.start_time {
            task.start_time = v;
        }
        if let Some(v) = self.strategic_category {
            task.strategic_category = v;
        }
        if let Some(v) = &self.recurrence {
            task.recurrence = v.clone();
        }
    }
}

/// Source of truth for the task backlog.
pub trait TaskStore {
    /// List tasks, optionally narrowed to a profile and/or category.
    fn list_tasks(
        &self,
        profile: Option<Profile>,
        category: Option<TaskCategory>,
    ) -> Result<Vec<Task>>;

    fn task(&self, id: &str) -> Result<Option<Task>>;

    fn create_task(&self, task: Task) -> Result<Task>;

    /// Apply a patch; errors with `CoreError::TaskNotFound` for unknown ids.
    fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task>;

    fn delete_task(&self, id: &str) -> Result<()>;
}

/// Per-user planner settings.
pub trait SettingsStore {
    /// Fetch settings, synthesizing and persisting defaults when absent.
    fn settings(&self) -> Result<DayPlannerSettings>;

    fn update_settings(&self, patch: SettingsPatch) -> Result<DayPlannerSettings>;
}

/// Day initialization records.
pub trait InitializationStore {
    fn initialization(&self, date: NaiveDate) -> Result<Option<PlannerInitialization>>;

    /// Record or overwrite T-zero for the date. Last write wins.
    fn upsert_initialization(&self, date: NaiveDate, t_zero: DateTime<Local>) -> Result<()>;

    /// Stamp `ended_at`; errors when no record exists for the date.
    fn mark_day_ended(&self, date: NaiveDate, at: DateTime<Local>) -> Result<()>;
}

/// Per-date rota overrides. The base rotation pattern comes from the app
/// config, not the store.
pub trait RotaStore {
    fn override_for(&self, date: NaiveDate) -> Result<Option<RotaOverride>>;

    fn list_overrides(&self) -> Result<Vec<RotaOverride>>;

    fn set_override(&self, override_: RotaOverride) -> Result<()>;

    fn clear_override(&self, date: NaiveDate) -> Result<()>;
}

/// Session state that survives a reload.
pub trait AppStateStore {
    fn active_task_id(&self) -> Result<Option<String>>;

    fn set_active_task_id(&self, id: Option<&str>) -> Result<()>;
}

/// Everything the planner needs from one backing store.
pub trait PlannerStore:
    TaskStore + SettingsStore + InitializationStore + RotaStore + AppStateStore
{
}

impl<T> PlannerStore for T where
    T: TaskStore + SettingsStore + InitializationStore + RotaStore + AppStateStore
{
}
