use clap::Subcommand;
use dayflow_core::{AppConfig, Result, RotaOverride, RotaStore, WorkCalendar};

use crate::common::{open_planner, parse_date_arg, parse_override_kind};

#[derive(Subcommand)]
pub enum RotaAction {
    /// Show work-day status and the upcoming shift days
    Show {
        #[arg(long)]
        date: Option<String>,
        /// Days to look ahead
        #[arg(long, default_value_t = 14)]
        days: u32,
    },
    /// Set a per-date override (holiday|absence|overtime)
    Set { date: String, kind: String },
    /// Remove a per-date override
    Clear { date: String },
    /// List overrides
    List,
}

pub fn run(action: RotaAction) -> Result<()> {
    match action {
        RotaAction::Show { date, days } => {
            let planner = open_planner()?;
            let config = AppConfig::load()?;
            let date = parse_date_arg(date.as_deref())?;
            let calendar = WorkCalendar::new(config.rota.pattern())
                .with_overrides(planner.store().list_overrides()?);

            let status = if calendar.is_work_day(date) {
                "work day"
            } else {
                "day off"
            };
            println!("{}: {status}", date.format("%Y-%m-%d"));
            println!("Upcoming shifts:");
            for shift in calendar.upcoming_work_days(date, days) {
                println!("  {}", shift.format("%Y-%m-%d"));
            }
            Ok(())
        }
        RotaAction::Set { date, kind } => {
            let planner = open_planner()?;
            let date = parse_date_arg(Some(&date))?;
            let kind = parse_override_kind(&kind)?;
            planner.store().set_override(RotaOverride { date, kind })?;
            println!("Override set: {} -> {}", date.format("%Y-%m-%d"), kind.as_str());
            Ok(())
        }
        RotaAction::Clear { date } => {
            let planner = open_planner()?;
            let date = parse_date_arg(Some(&date))?;
            planner.store().clear_override(date)?;
            println!("Override cleared for {}", date.format("%Y-%m-%d"));
            Ok(())
        }
        RotaAction::List => {
            let planner = open_planner()?;
            for override_ in planner.store().list_overrides()? {
                println!(
                    "{}  {}",
                    override_.date.format("%Y-%m-%d"),
                    override_.kind.as_str()
                );
            }
            Ok(())
        }
    }
}
