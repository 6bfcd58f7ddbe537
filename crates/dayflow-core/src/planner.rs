//! Interactive planner session: plan assembly and the mutation layer.
//!
//! [`Planner`] owns the two pieces of session state the engine refuses to
//! hold — the active-task pointer (persisted, so a reload resumes it) and
//! the Flow Mode flag (session-only). Every mutation is a single store
//! write; synthesis always runs on a fresh snapshot afterwards.

use chrono::{Days, Local, NaiveDate};

use crate::engine::{synthesize, DayPlan, PlanInputs};
use crate::error::Result;
use crate::rota::{RotaPattern, WorkCalendar};
use crate::store::{PlannerStore, TaskPatch};
use crate::task::{base_task_id, occurrence_for, Task, TaskCategory};
use crate::time::Minutes;

/// A synthesized plan plus the side lists callers render next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerOutput {
    pub date: NaiveDate,
    pub is_work_day: bool,
    pub plan: DayPlan,
    /// Reminder-category tasks for the date (or undated), priority-sorted.
    /// Never part of the timeline.
    pub reminders: Vec<Task>,
}

/// Planner session over one backing store.
pub struct Planner<S: PlannerStore> {
    store: S,
    pattern: RotaPattern,
    active_task: Option<String>,
    flow_mode: bool,
}

impl<S: PlannerStore> Planner<S> {
    /// Open a session, resuming the persisted active-task pointer.
    pub fn new(store: S, pattern: RotaPattern) -> Result<Self> {
        let active_task = store.active_task_id()?;
        Ok(Planner {
            store,
            pattern,
            active_task,
            flow_mode: false,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn active_task(&self) -> Option<&str> {
        self.active_task.as_deref()
    }

    pub fn flow_mode(&self) -> bool {
        self.flow_mode
    }

    /// Toggle Flow Mode; returns the new state.
    pub fn toggle_flow(&mut self) -> bool {
        self.flow_mode = !self.flow_mode;
        self.flow_mode
    }

    fn calendar(&self) -> Result<WorkCalendar> {
        Ok(WorkCalendar::new(self.pattern).with_overrides(self.store.list_overrides()?))
    }

    pub fn is_work_day(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.calendar()?.is_work_day(date))
    }

    /// Assemble a fresh snapshot and synthesize the day's timeline.
    pub fn plan(&self, date: NaiveDate, now: Minutes) -> Result<PlannerOutput> {
        let calendar = self.calendar()?;
        let is_work_day = calendar.is_work_day(date);
        let settings = self.store.settings()?;
        let initialization = self.store.initialization(date)?;
        let all = self.store.list_tasks(None, None)?;

        let tasks: Vec<Task> = all
            .iter()
            .filter(|t| t.category == TaskCategory::Todo && !t.is_completed)
            .filter_map(|t| occurrence_for(t, date, is_work_day))
            .collect();

        let mut reminders: Vec<Task> = all
            .into_iter()
            .filter(|t| {
                t.category == TaskCategory::Reminder
                    && !t.is_completed
                    && t.due_date.map_or(true, |due| due == date)
            })
            .collect();
        reminders.sort_by(|a, b| {
            b.priority
                .weight()
                .cmp(&a.priority.weight())
                .then(b.impact().cmp(&a.impact()))
        });

        let inputs = PlanInputs {
            is_work_day,
            settings: &settings,
            initialization: initialization.as_ref(),
            tasks: &tasks,
            now,
            active_task: self.active_task.as_deref(),
            flow_mode: self.flow_mode,
        };

        Ok(PlannerOutput {
            date,
            is_work_day,
            plan: synthesize(&inputs),
            reminders,
        })
    }

    /// Plan for the current wall-clock date and minute.
    pub fn plan_today(&self) -> Result<PlannerOutput> {
        let now = Local::now();
        self.plan(now.date_naive(), Minutes::from_clock(&now))
    }

    /// Toggle start/pause on a task. Starting while another task is active
    /// replaces it. Returns the new pointer value.
    ///
    /// The pointer is persisted before the in-memory copy changes, so a
    /// failed write leaves the session state consistent.
    pub fn start_pause(&mut self, id: &str) -> Result<Option<String>> {
        let base = base_task_id(id);
        let next = if self.active_task.as_deref() == Some(base) {
            None
        } else {
            Some(base.to_string())
        };
        self.store.set_active_task_id(next.as_deref())?;
        self.active_task = next.clone();
        Ok(next)
    }

    /// Mark a task completed. Clears the active pointer if it pointed here,
    /// only after the completion write succeeded.
    pub fn complete(&mut self, id: &str) -> Result<Task> {
        let base = base_task_id(id);
        let task = self.store.update_task(base, TaskPatch::completed(true))?;
        if self.active_task.as_deref() == Some(base) {
            self.store.set_active_task_id(None)?;
            self.active_task = None;
        }
        Ok(task)
    }

    /// Move a task's due date to `target`, defaulting to tomorrow. A
    /// direct overwrite: recurring tasks keep their rule and will still
    /// expand on matching dates.
    pub fn reschedule(&mut self, id: &str, target: Option<NaiveDate>) -> Result<Task> {
        let base = base_task_id(id);
        let date = match target {
            Some(d) => d,
            None => Local::now().date_naive() + Days::new(1),
        };
        let task = self.store.update_task(base, TaskPatch::due(date))?;
        if self.active_task.as_deref() == Some(base) {
            self.store.set_active_task_id(None)?;
            self.active_task = None;
        }
        Ok(task)
    }

    /// Record T-zero for the date. Idempotent, last write wins.
    pub fn initialize_day(&self, date: NaiveDate) -> Result<()> {
        self.store.upsert_initialization(date, Local::now())
    }

    /// Re-stamp T-zero. Unified with [`initialize_day`]: same upsert.
    pub fn reinitialize_day(&self, date: NaiveDate) -> Result<()> {
        self.initialize_day(date)
    }

    /// Stamp the day as ended. The active-task pointer is cleared even when
    /// the stamp fails to persist; the error still surfaces so the caller
    /// can warn.
    pub fn end_day(&mut self, date: NaiveDate) -> Result<()> {
        self.active_task = None;
        let pointer = self.store.set_active_task_id(None);
        let stamp = self.store.mark_day_ended(date, Local::now());
        pointer.and(stamp)
    }
}
