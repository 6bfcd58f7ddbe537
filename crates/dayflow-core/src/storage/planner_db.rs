//! SQLite-based storage for tasks, settings, initializations, and rota
//! overrides.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::init::PlannerInitialization;
use crate::rota::{OverrideKind, RotaOverride};
use crate::settings::{DayPlannerSettings, SettingsPatch};
use crate::store::{
    AppStateStore, InitializationStore, RotaStore, SettingsStore, TaskPatch, TaskStore,
};
use crate::task::{
    DeadlineType, DueDateMode, Priority, Profile, RecurrenceConfig, StrategicCategory, Task,
    TaskCategory,
};
use crate::time::Minutes;

const ACTIVE_TASK_KEY: &str = "active_task_id";

// === Helper Functions ===

fn parse_priority(s: &str) -> Priority {
    match s {
        "urgent" => Priority::Urgent,
        "super" => Priority::Super,
        "high" => Priority::High,
        "mid" => Priority::Mid,
        _ => Priority::Low,
    }
}

fn parse_profile(s: &str) -> Profile {
    match s {
        "business" => Profile::Business,
        _ => Profile::Personal,
    }
}

fn parse_category(s: &str) -> TaskCategory {
    match s {
        "grocery" => TaskCategory::Grocery,
        "reminder" => TaskCategory::Reminder,
        _ => TaskCategory::Todo,
    }
}

fn parse_strategic_category(s: Option<&str>) -> Option<StrategicCategory> {
    match s {
        Some("finance") => Some(StrategicCategory::Finance),
        Some("career") => Some(StrategicCategory::Career),
        Some("health") => Some(StrategicCategory::Health),
        Some("personal") => Some(StrategicCategory::Personal),
        _ => None,
    }
}

fn parse_due_date_mode(s: Option<&str>) -> DueDateMode {
    match s {
        Some("before") => DueDateMode::Before,
        Some("range") => DueDateMode::Range,
        _ => DueDateMode::On,
    }
}

fn parse_deadline_type(s: Option<&str>) -> DeadlineType {
    match s {
        Some("hard") => DeadlineType::Hard,
        _ => DeadlineType::Soft,
    }
}

fn parse_date(s: Option<&str>) -> Option<NaiveDate> {
    s.and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

fn parse_minutes(s: Option<&str>) -> Option<Minutes> {
    s.and_then(|v| Minutes::parse(v).ok())
}

/// Parse datetime from RFC3339 with fallback to now; malformed timestamps
/// should not lose the row.
fn parse_datetime_fallback(s: &str) -> DateTime<Local> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Local))
        .unwrap_or_else(|_| Local::now())
}

fn parse_recurrence(s: Option<&str>) -> Option<RecurrenceConfig> {
    s.and_then(|v| serde_json::from_str(v).ok())
}

fn format_recurrence(config: Option<&RecurrenceConfig>) -> Option<String> {
    config.and_then(|c| serde_json::to_string(c).ok())
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let profile: String = row.get(1)?;
    let category: String = row.get(3)?;
    let priority: String = row.get(4)?;
    let strategic: Option<String> = row.get(5)?;
    let start_time: Option<String> = row.get(10)?;
    let due_date: Option<String> = row.get(12)?;
    let due_date_mode: Option<String> = row.get(13)?;
    let end_date: Option<String> = row.get(14)?;
    let deadline_type: Option<String> = row.get(15)?;
    let recurrence: Option<String> = row.get(16)?;
    let created_at: String = row.get(18)?;

    Ok(Task {
        id: row.get(0)?,
        profile: parse_profile(&profile),
        title: row.get(2)?,
        category: parse_category(&category),
        priority: parse_priority(&priority),
        strategic_category: parse_strategic_category(strategic.as_deref()),
        estimated_duration: row.get(6)?,
        impact_score: row.get(7)?,
        travel_to_duration: row.get(8)?,
        travel_from_duration: row.get(9)?,
        start_time: parse_minutes(start_time.as_deref()),
        location: row.get(11)?,
        due_date: parse_date(due_date.as_deref()),
        due_date_mode: parse_due_date_mode(due_date_mode.as_deref()),
        end_date: parse_date(end_date.as_deref()),
        deadline_type: parse_deadline_type(deadline_type.as_deref()),
        recurrence: parse_recurrence(recurrence.as_deref()),
        is_completed: row.get(17)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .unwrap_or_else(|_| chrono::Utc::now()),
    })
}

const TASK_COLUMNS: &str = "id, profile, title, category, priority, strategic_category, \
     estimated_duration, impact_score, travel_to_duration, travel_from_duration, start_time, \
     location, due_date, due_date_mode, end_date, deadline_type, recurrence, is_completed, \
     created_at";

/// SQLite database backing every planner store contract.
pub struct PlannerDb {
    conn: Connection,
}

impl PlannerDb {
    /// Open the planner database at `~/.config/dayflow/dayflow.db`.
    ///
    /// Creates tables if they don't exist.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("dayflow.db");
        Self::open_at(&path)
    }

    /// Open a database at an explicit path (used by tests and tooling).
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> std::result::Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id                   TEXT PRIMARY KEY,
                profile              TEXT NOT NULL DEFAULT 'personal',
                title                TEXT NOT NULL,
                category             TEXT NOT NULL DEFAULT 'todo',
                priority             TEXT NOT NULL DEFAULT 'low',
                strategic_category   TEXT,
                estimated_duration   INTEGER,
                impact_score         INTEGER,
                travel_to_duration   INTEGER,
                travel_from_duration INTEGER,
                start_time           TEXT,
                location             TEXT,
                due_date             TEXT,
                due_date_mode        TEXT NOT NULL DEFAULT 'on',
                end_date             TEXT,
                deadline_type        TEXT NOT NULL DEFAULT 'soft',
                recurrence           TEXT,
                is_completed         INTEGER NOT NULL DEFAULT 0,
                created_at           TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS planner_settings (
                id   INTEGER PRIMARY KEY CHECK (id = 1),
                data TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS planner_initializations (
                date     TEXT PRIMARY KEY,
                t_zero   TEXT NOT NULL,
                ended_at TEXT
            );

            CREATE TABLE IF NOT EXISTS rota_overrides (
                date TEXT PRIMARY KEY,
                kind TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS app_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    fn fetch_task(&self, id: &str) -> Result<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        let task = self
            .conn
            .query_row(&sql, params![id], row_to_task)
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(task)
    }

    fn write_task(&self, task: &Task) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO tasks (id, profile, title, category, priority, strategic_category,
                    estimated_duration, impact_score, travel_to_duration, travel_from_duration,
                    start_time, location, due_date, due_date_mode, end_date, deadline_type,
                    recurrence, is_completed, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                    ?17, ?18, ?19)
                 ON CONFLICT(id) DO UPDATE SET
                    profile = excluded.profile,
                    title = excluded.title,
                    category = excluded.category,
                    priority = excluded.priority,
                    strategic_category = excluded.strategic_category,
                    estimated_duration = excluded.estimated_duration,
                    impact_score = excluded.impact_score,
                    travel_to_duration = excluded.travel_to_duration,
                    travel_from_duration = excluded.travel_from_duration,
                    start_time = excluded.start_time,
                    location = excluded.location,
                    due_date = excluded.due_date,
                    due_date_mode = excluded.due_date_mode,
                    end_date = excluded.end_date,
                    deadline_type = excluded.deadline_type,
                    recurrence = excluded.recurrence,
                    is_completed = excluded.is_completed",
                params![
                    task.id,
                    task.profile.as_str(),
                    task.title,
                    task.category.as_str(),
                    task.priority.as_str(),
                    task.strategic_category.map(StrategicCategory::as_str),
                    task.estimated_duration,
                    task.impact_score,
                    task.travel_to_duration,
                    task.travel_from_duration,
                    task.start_time.map(|t| t.to_string()),
                    task.location,
                    task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    match task.due_date_mode {
                        DueDateMode::On => "on",
                        DueDateMode::Before => "before",
                        DueDateMode::Range => "range",
                    },
                    task.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    match task.deadline_type {
                        DeadlineType::Soft => "soft",
                        DeadlineType::Hard => "hard",
                    },
                    format_recurrence(task.recurrence.as_ref()),
                    task.is_completed,
                    task.created_at.to_rfc3339(),
                ],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}

impl TaskStore for PlannerDb {
    fn list_tasks(
        &self,
        profile: Option<Profile>,
        category: Option<TaskCategory>,
    ) -> Result<Vec<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC");
        let mut stmt = self.conn.prepare(&sql).map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map([], row_to_task)
            .map_err(DatabaseError::from)?;

        let mut tasks = Vec::new();
        for row in rows {
            let task = row.map_err(DatabaseError::from)?;
            if profile.is_some_and(|p| task.profile != p) {
                continue;
            }
            if category.is_some_and(|c| task.category != c) {
                continue;
            }
            tasks.push(task);
        }
        Ok(tasks)
    }

    fn task(&self, id: &str) -> Result<Option<Task>> {
        self.fetch_task(id)
    }

    fn create_task(&self, task: Task) -> Result<Task> {
        self.write_task(&task)?;
        Ok(task)
    }

    fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let mut task = self
            .fetch_task(id)?
            .ok_or_else(|| crate::error::CoreError::TaskNotFound { id: id.to_string() })?;
        patch.apply(&mut task);
        self.write_task(&task)?;
        Ok(task)
    }

    fn delete_task(&self, id: &str) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(DatabaseError::from)?;
        if affected == 0 {
            return Err(crate::error::CoreError::TaskNotFound { id: id.to_string() });
        }
        Ok(())
    }
}

impl SettingsStore for PlannerDb {
    fn settings(&self) -> Result<DayPlannerSettings> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT data FROM planner_settings WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()
            .map_err(DatabaseError::from)?;

        match raw {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => {
                // First read: seed the defaults so later updates have a row.
                let defaults = DayPlannerSettings::default();
                self.persist_settings(&defaults)?;
                Ok(defaults)
            }
        }
    }

    fn update_settings(&self, patch: SettingsPatch) -> Result<DayPlannerSettings> {
        let mut settings = self.settings()?;
        patch.apply(&mut settings);
        self.persist_settings(&settings)?;
        Ok(settings)
    }
}

impl PlannerDb {
    fn persist_settings(&self, settings: &DayPlannerSettings) -> Result<()> {
        let data = serde_json::to_string(settings)?;
        self.conn
            .execute(
                "INSERT INTO planner_settings (id, data) VALUES (1, ?1)
                 ON CONFLICT(id) DO UPDATE SET data = excluded.data",
                params![data],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}

impl InitializationStore for PlannerDb {
    fn initialization(&self, date: NaiveDate) -> Result<Option<PlannerInitialization>> {
        let record = self
            .conn
            .query_row(
                "SELECT t_zero, ended_at FROM planner_initializations WHERE date = ?1",
                params![date.format("%Y-%m-%d").to_string()],
                |row| {
                    let t_zero: String = row.get(0)?;
                    let ended_at: Option<String> = row.get(1)?;
                    Ok((t_zero, ended_at))
                },
            )
            .optional()
            .map_err(DatabaseError::from)?;

        Ok(record.map(|(t_zero, ended_at)| PlannerInitialization {
            date,
            t_zero: parse_datetime_fallback(&t_zero),
            ended_at: ended_at.as_deref().map(parse_datetime_fallback),
        }))
    }

    fn upsert_initialization(&self, date: NaiveDate, t_zero: DateTime<Local>) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO planner_initializations (date, t_zero) VALUES (?1, ?2)
                 ON CONFLICT(date) DO UPDATE SET t_zero = excluded.t_zero",
                params![date.format("%Y-%m-%d").to_string(), t_zero.to_rfc3339()],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    fn mark_day_ended(&self, date: NaiveDate, at: DateTime<Local>) -> Result<()> {
        let key = date.format("%Y-%m-%d").to_string();
        let affected = self
            .conn
            .execute(
                "UPDATE planner_initializations SET ended_at = ?2 WHERE date = ?1",
                params![key, at.to_rfc3339()],
            )
            .map_err(DatabaseError::from)?;
        if affected == 0 {
            return Err(DatabaseError::RowMissing {
                table: "planner_initializations",
                key,
            }
            .into());
        }
        Ok(())
    }
}

impl RotaStore for PlannerDb {
    fn override_for(&self, date: NaiveDate) -> Result<Option<RotaOverride>> {
        let kind: Option<String> = self
            .conn
            .query_row(
                "SELECT kind FROM rota_overrides WHERE date = ?1",
                params![date.format("%Y-%m-%d").to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(DatabaseError::from)?;

        Ok(kind
            .as_deref()
            .and_then(parse_override_kind)
            .map(|kind| RotaOverride { date, kind }))
    }

    fn list_overrides(&self) -> Result<Vec<RotaOverride>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, kind FROM rota_overrides ORDER BY date")
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map([], |row| {
                let date: String = row.get(0)?;
                let kind: String = row.get(1)?;
                Ok((date, kind))
            })
            .map_err(DatabaseError::from)?;

        let mut overrides = Vec::new();
        for row in rows {
            let (date, kind) = row.map_err(DatabaseError::from)?;
            // Malformed rows are skipped, not fatal.
            if let (Some(date), Some(kind)) = (
                parse_date(Some(date.as_str())),
                parse_override_kind(kind.as_str()),
            ) {
                overrides.push(RotaOverride { date, kind });
            }
        }
        Ok(overrides)
    }

    fn set_override(&self, override_: RotaOverride) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO rota_overrides (date, kind) VALUES (?1, ?2)
                 ON CONFLICT(date) DO UPDATE SET kind = excluded.kind",
                params![
                    override_.date.format("%Y-%m-%d").to_string(),
                    override_.kind.as_str()
                ],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    fn clear_override(&self, date: NaiveDate) -> Result<()> {
        self.conn
            .execute(
                "DELETE FROM rota_overrides WHERE date = ?1",
                params![date.format("%Y-%m-%d").to_string()],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}

fn parse_override_kind(s: &str) -> Option<OverrideKind> {
    match s {
        "holiday" => Some(OverrideKind::Holiday),
        "absence" => Some(OverrideKind::Absence),
        "overtime" => Some(OverrideKind::Overtime),
        _ => None,
    }
}

impl AppStateStore for PlannerDb {
    fn active_task_id(&self) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![ACTIVE_TASK_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(value)
    }

    fn set_active_task_id(&self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) => {
                self.conn
                    .execute(
                        "INSERT INTO app_state (key, value) VALUES (?1, ?2)
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                        params![ACTIVE_TASK_KEY, id],
                    )
                    .map_err(DatabaseError::from)?;
            }
            None => {
                self.conn
                    .execute(
                        "DELETE FROM app_state WHERE key = ?1",
                        params![ACTIVE_TASK_KEY],
                    )
                    .map_err(DatabaseError::from)?;
            }
        }
        Ok(())
    }
}
