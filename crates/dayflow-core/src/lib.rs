//! # Dayflow Core Library
//!
//! Core business logic for the Dayflow day planner. The CLI binary is a
//! thin layer over this crate; everything interesting happens here.
//!
//! ## Architecture
//!
//! - **Engine**: a pure, deterministic transform from one day's inputs
//!   (settings, rota, initialization, task snapshot, clock) to an ordered
//!   timeline — no internal state, safe to re-run on every input change
//! - **Rota**: repeating on/off shift pattern with per-date overrides
//! - **Recurrence**: per-date expansion of the task backlog, including
//!   legacy shift-relative configs
//! - **Storage**: SQLite-backed stores plus TOML application config
//! - **Planner**: the interactive session layer owning the active-task
//!   pointer and Flow Mode, and the only source of write effects
//!
//! ## Key Components
//!
//! - [`engine::synthesize`]: the timeline synthesis engine
//! - [`Planner`]: interactive mutations (start/pause, complete, reschedule)
//! - [`PlannerDb`]: task/settings/initialization/rota persistence
//! - [`WorkCalendar`]: work-day classification

pub mod engine;
pub mod error;
pub mod init;
pub mod planner;
pub mod rota;
pub mod settings;
pub mod storage;
pub mod store;
pub mod task;
pub mod time;

pub use engine::{due_now, synthesize, DayPlan, ItemClass, ItemKind, PlanInputs, TimelineItem};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use init::PlannerInitialization;
pub use planner::{Planner, PlannerOutput};
pub use rota::{OverrideKind, RotaOverride, RotaPattern, WorkCalendar};
pub use settings::{DayPlannerSettings, EveningConstraints, SettingsPatch};
pub use storage::{AppConfig, PlannerDb};
pub use store::{
    AppStateStore, InitializationStore, PlannerStore, RotaStore, SettingsStore, TaskPatch,
    TaskStore,
};
pub use task::{
    DeadlineType, DueDateMode, Priority, Profile, RecurrenceConfig, RecurrenceRule,
    StrategicCategory, Task, TaskCategory,
};
pub use time::Minutes;
