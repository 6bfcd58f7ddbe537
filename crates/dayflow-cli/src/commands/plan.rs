use clap::Subcommand;
use dayflow_core::{DayPlan, PlannerOutput, Result, TimelineItem};
use serde_json::json;

use crate::common::{open_planner, parse_date_arg, parse_now_arg};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Show the synthesized timeline for a day
    Show {
        /// Target date (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,
        /// Clock reading (HH:MM) used for current/stalled flags, default now
        #[arg(long)]
        now: Option<String>,
        /// Enable Flow Mode for this run
        #[arg(long)]
        flow: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PlanAction) -> Result<()> {
    match action {
        PlanAction::Show {
            date,
            now,
            flow,
            json,
        } => show(date.as_deref(), now.as_deref(), flow, json),
    }
}

fn plan_state(plan: &DayPlan) -> &'static str {
    match plan {
        DayPlan::AwaitingInitialization => "awaiting_initialization",
        DayPlan::Chill(_) => "chill",
        DayPlan::Scheduled(_) => "scheduled",
    }
}

fn show(date: Option<&str>, now: Option<&str>, flow: bool, json: bool) -> Result<()> {
    let mut planner = open_planner()?;
    if flow {
        planner.toggle_flow();
    }
    let date = parse_date_arg(date)?;
    let now = parse_now_arg(now)?;
    let output = planner.plan(date, now)?;

    if json {
        print_json(&output)?;
    } else {
        print_human(&output);
    }
    Ok(())
}

fn print_json(output: &PlannerOutput) -> Result<()> {
    let doc = json!({
        "date": output.date.format("%Y-%m-%d").to_string(),
        "is_work_day": output.is_work_day,
        "state": plan_state(&output.plan),
        "items": output.plan.items(),
        "reminders": output.reminders,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn print_human(output: &PlannerOutput) {
    let day_kind = if output.is_work_day { "work day" } else { "day off" };
    println!("{} ({day_kind})", output.date.format("%Y-%m-%d"));

    match &output.plan {
        DayPlan::AwaitingInitialization => {
            println!("Not initialized yet. Run `dayflow day init` to start your day.");
        }
        DayPlan::Chill(items) => {
            println!("Chill mode: urgent tasks only.");
            for item in items {
                println!("  {}", format_item(item));
            }
        }
        DayPlan::Scheduled(items) => {
            for item in items {
                println!("  {}", format_item(item));
            }
        }
    }

    if !output.reminders.is_empty() {
        println!("Reminders:");
        for reminder in &output.reminders {
            println!("  [{}] {}", reminder.priority.as_str(), reminder.title);
        }
    }
}

fn format_item(item: &TimelineItem) -> String {
    let mut flags = String::new();
    if item.is_completed {
        flags.push_str(" [done]");
    }
    if item.is_active {
        flags.push_str(" [active]");
    }
    if item.is_current {
        flags.push_str(" [now]");
    }
    if item.is_stalled {
        flags.push_str(" [stalled]");
    }
    format!(
        "{}  {} ({}m){}",
        item.time_label(),
        item.title,
        item.duration,
        flags
    )
}
