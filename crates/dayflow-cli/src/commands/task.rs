use clap::Subcommand;
use dayflow_core::{RecurrenceConfig, Result, Task, TaskPatch, TaskStore};

use crate::common::{
    open_planner, parse_category, parse_date_arg, parse_deadline, parse_due_mode, parse_priority,
    parse_profile, parse_strategic,
};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task
    Add {
        title: String,
        #[arg(long, default_value = "personal")]
        profile: String,
        #[arg(long, default_value = "todo")]
        category: String,
        #[arg(long, default_value = "low")]
        priority: String,
        /// Strategic category (finance|career|health|personal)
        #[arg(long)]
        strategic: Option<String>,
        /// Estimated duration in minutes
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        impact: Option<i32>,
        /// Travel minutes before the task
        #[arg(long)]
        travel_to: Option<u32>,
        /// Travel minutes after the task
        #[arg(long)]
        travel_from: Option<u32>,
        /// Fixed appointment time (HH:MM)
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        #[arg(long, default_value = "on")]
        due_mode: String,
        #[arg(long, default_value = "soft")]
        deadline: String,
        /// Recurrence rule (daily|work_days|off_days|custom)
        #[arg(long)]
        recur: Option<String>,
        /// Weekdays for custom recurrence, Sunday=0, e.g. "1,3,5"
        #[arg(long)]
        days_of_week: Option<String>,
    },
    /// List tasks
    List {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// Start or pause a task (single active task at a time)
    Start { id: String },
    /// Mark a task completed
    Complete { id: String },
    /// Move a task's due date (default: tomorrow)
    Reschedule {
        id: String,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Rename a task
    Edit {
        id: String,
        #[arg(long)]
        title: String,
    },
    /// Delete a task
    Delete { id: String },
}

pub fn run(action: TaskAction) -> Result<()> {
    match action {
        TaskAction::Add {
            title,
            profile,
            category,
            priority,
            strategic,
            duration,
            impact,
            travel_to,
            travel_from,
            start,
            location,
            due,
            due_mode,
            deadline,
            recur,
            days_of_week,
        } => {
            let planner = open_planner()?;
            let mut task = Task::new(title, parse_profile(&profile)?, parse_category(&category)?);
            task.priority = parse_priority(&priority)?;
            task.strategic_category = strategic.as_deref().map(parse_strategic).transpose()?;
            task.estimated_duration = duration;
            task.impact_score = impact;
            task.travel_to_duration = travel_to;
            task.travel_from_duration = travel_from;
            task.start_time = start.as_deref().map(parse_now_arg_strict).transpose()?;
            task.location = location;
            task.due_date = due.as_deref().map(|d| parse_date_arg(Some(d))).transpose()?;
            task.due_date_mode = parse_due_mode(&due_mode)?;
            task.deadline_type = parse_deadline(&deadline)?;
            task.recurrence = build_recurrence(recur.as_deref(), days_of_week.as_deref())?;

            let created = planner.store().create_task(task)?;
            println!("Task created: {} ({})", created.title, created.id);
            Ok(())
        }
        TaskAction::List {
            profile,
            category,
            all,
            json,
        } => {
            let planner = open_planner()?;
            let profile = profile.as_deref().map(parse_profile).transpose()?;
            let category = category.as_deref().map(parse_category).transpose()?;
            let mut tasks = planner.store().list_tasks(profile, category)?;
            if !all {
                tasks.retain(|t| !t.is_completed);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                for task in &tasks {
                    let done = if task.is_completed { "x" } else { " " };
                    println!(
                        "[{done}] {}  {} ({}, {}, {}m)",
                        task.id,
                        task.title,
                        task.profile.as_str(),
                        task.priority.as_str(),
                        task.duration_minutes(),
                    );
                }
            }
            Ok(())
        }
        TaskAction::Start { id } => {
            let mut planner = open_planner()?;
            match planner.start_pause(&id)? {
                Some(active) => println!("Started: {active}"),
                None => println!("Paused"),
            }
            Ok(())
        }
        TaskAction::Complete { id } => {
            let mut planner = open_planner()?;
            let task = planner.complete(&id)?;
            println!("Completed: {}", task.title);
            Ok(())
        }
        TaskAction::Reschedule { id, to } => {
            let mut planner = open_planner()?;
            let target = to.as_deref().map(|d| parse_date_arg(Some(d))).transpose()?;
            let task = planner.reschedule(&id, target)?;
            match task.due_date {
                Some(due) => println!("Rescheduled '{}' to {}", task.title, due.format("%Y-%m-%d")),
                None => println!("Rescheduled '{}'", task.title),
            }
            Ok(())
        }
        TaskAction::Edit { id, title } => {
            let planner = open_planner()?;
            let patch = TaskPatch {
                title: Some(title),
                ..Default::default()
            };
            let task = planner.store().update_task(&id, patch)?;
            println!("Updated: {}", task.title);
            Ok(())
        }
        TaskAction::Delete { id } => {
            let planner = open_planner()?;
            planner.store().delete_task(&id)?;
            println!("Deleted: {id}");
            Ok(())
        }
    }
}

fn parse_now_arg_strict(value: &str) -> Result<dayflow_core::Minutes> {
    Ok(dayflow_core::Minutes::parse(value)?)
}

fn build_recurrence(
    recur: Option<&str>,
    days_of_week: Option<&str>,
) -> Result<Option<RecurrenceConfig>> {
    let Some(kind) = recur else {
        return Ok(None);
    };
    match kind {
        "daily" | "work_days" | "off_days" => Ok(Some(RecurrenceConfig {
            kind: Some(kind.to_string()),
            ..Default::default()
        })),
        "custom" => {
            let days = days_of_week
                .ok_or_else(|| {
                    dayflow_core::CoreError::Custom(
                        "--days-of-week is required for custom recurrence".to_string(),
                    )
                })?
                .split(',')
                .map(|s| {
                    s.trim().parse::<u8>().map_err(|_| {
                        dayflow_core::CoreError::Custom(format!("invalid weekday '{s}'"))
                    })
                })
                .collect::<Result<Vec<u8>>>()?;
            Ok(Some(RecurrenceConfig {
                kind: Some("custom".to_string()),
                days_of_week: Some(days),
                ..Default::default()
            }))
        }
        other => Err(dayflow_core::CoreError::Custom(format!(
            "unknown recurrence '{other}' (daily|work_days|off_days|custom)"
        ))),
    }
}
