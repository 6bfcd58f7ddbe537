use clap::Subcommand;
use dayflow_core::Result;

use crate::common::{open_planner, parse_date_arg};

#[derive(Subcommand)]
pub enum DayAction {
    /// Record T-zero for a day (default today)
    Init {
        #[arg(long)]
        date: Option<String>,
    },
    /// Re-stamp T-zero for an already initialized day
    Reinit {
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark the day ended and clear the active task
    End {
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(action: DayAction) -> Result<()> {
    match action {
        DayAction::Init { date } => {
            let planner = open_planner()?;
            let date = parse_date_arg(date.as_deref())?;
            planner.initialize_day(date)?;
            println!("Day {} initialized", date.format("%Y-%m-%d"));
            Ok(())
        }
        DayAction::Reinit { date } => {
            let planner = open_planner()?;
            let date = parse_date_arg(date.as_deref())?;
            planner.reinitialize_day(date)?;
            println!("Day {} re-initialized", date.format("%Y-%m-%d"));
            Ok(())
        }
        DayAction::End { date } => {
            let mut planner = open_planner()?;
            let date = parse_date_arg(date.as_deref())?;
            // The end stamp is best-effort; the active task is cleared
            // either way.
            if let Err(e) = planner.end_day(date) {
                eprintln!("warning: could not persist day end: {e}");
            }
            println!("Day {} ended, active task cleared", date.format("%Y-%m-%d"));
            Ok(())
        }
    }
}
