//! Shared helpers for CLI commands.

use chrono::{Local, NaiveDate};
use dayflow_core::{
    AppConfig, CoreError, DeadlineType, DueDateMode, Minutes, OverrideKind, Planner, PlannerDb,
    Priority, Profile, Result, StrategicCategory, TaskCategory,
};

/// Open the planner session over the on-disk database and config.
pub fn open_planner() -> Result<Planner<PlannerDb>> {
    let config = AppConfig::load()?;
    let db = PlannerDb::open()?;
    Planner::new(db, config.rota.pattern())
}

/// Parse a `YYYY-MM-DD` argument, defaulting to today.
pub fn parse_date_arg(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map_err(|_| CoreError::Custom(format!("invalid date '{v}', expected YYYY-MM-DD"))),
        None => Ok(Local::now().date_naive()),
    }
}

/// Parse an `HH:MM` argument, defaulting to the current minute.
pub fn parse_now_arg(value: Option<&str>) -> Result<Minutes> {
    match value {
        Some(v) => Ok(Minutes::parse(v)?),
        None => Ok(Minutes::from_clock(&Local::now())),
    }
}

pub fn parse_profile(value: &str) -> Result<Profile> {
    match value {
        "personal" => Ok(Profile::Personal),
        "business" => Ok(Profile::Business),
        other => Err(CoreError::Custom(format!(
            "unknown profile '{other}' (personal|business)"
        ))),
    }
}

pub fn parse_category(value: &str) -> Result<TaskCategory> {
    match value {
        "todo" => Ok(TaskCategory::Todo),
        "grocery" => Ok(TaskCategory::Grocery),
        "reminder" => Ok(TaskCategory::Reminder),
        other => Err(CoreError::Custom(format!(
            "unknown category '{other}' (todo|grocery|reminder)"
        ))),
    }
}

pub fn parse_priority(value: &str) -> Result<Priority> {
    match value {
        "urgent" => Ok(Priority::Urgent),
        "super" => Ok(Priority::Super),
        "high" => Ok(Priority::High),
        "mid" => Ok(Priority::Mid),
        "low" => Ok(Priority::Low),
        other => Err(CoreError::Custom(format!(
            "unknown priority '{other}' (urgent|super|high|mid|low)"
        ))),
    }
}

pub fn parse_strategic(value: &str) -> Result<StrategicCategory> {
    match value {
        "finance" => Ok(StrategicCategory::Finance),
        "career" => Ok(StrategicCategory::Career),
        "health" => Ok(StrategicCategory::Health),
        "personal" => Ok(StrategicCategory::Personal),
        other => Err(CoreError::Custom(format!(
            "unknown strategic category '{other}' (finance|career|health|personal)"
        ))),
    }
}

pub fn parse_due_mode(value: &str) -> Result<DueDateMode> {
    match value {
        "on" => Ok(DueDateMode::On),
        "before" => Ok(DueDateMode::Before),
        "range" => Ok(DueDateMode::Range),
        other => Err(CoreError::Custom(format!(
            "unknown due-date mode '{other}' (on|before|range)"
        ))),
    }
}

pub fn parse_deadline(value: &str) -> Result<DeadlineType> {
    match value {
        "soft" => Ok(DeadlineType::Soft),
        "hard" => Ok(DeadlineType::Hard),
        other => Err(CoreError::Custom(format!(
            "unknown deadline type '{other}' (soft|hard)"
        ))),
    }
}

pub fn parse_override_kind(value: &str) -> Result<OverrideKind> {
    match value {
        "holiday" => Ok(OverrideKind::Holiday),
        "absence" => Ok(OverrideKind::Absence),
        "overtime" => Ok(OverrideKind::Overtime),
        other => Err(CoreError::Custom(format!(
            "unknown override kind '{other}' (holiday|absence|overtime)"
        ))),
    }
}
