use std::thread;
use std::time::Duration;

use clap::Args;
use dayflow_core::{due_now, AppConfig, Result};

use crate::common::open_planner;

#[derive(Args)]
pub struct WatchArgs {
    /// Poll interval in seconds
    #[arg(long, default_value_t = 60)]
    interval_secs: u64,
}

/// Coarse once-a-minute ticker: re-plans and prints a "time to start" line
/// for items whose nominal start equals the current minute. Read-only --
/// the backlog is never mutated from here.
pub fn run(args: WatchArgs) -> Result<()> {
    let config = AppConfig::load()?;
    if !config.notifications.enabled {
        println!("Notifications are disabled in config.toml");
        return Ok(());
    }

    let planner = open_planner()?;
    println!("Watching timeline (every {}s). Ctrl-C to stop.", args.interval_secs);

    loop {
        let now = chrono::Local::now();
        let output = planner.plan(
            now.date_naive(),
            dayflow_core::Minutes::from_clock(&now),
        )?;
        for item in due_now(output.plan.items(), dayflow_core::Minutes::from_clock(&now)) {
            println!(
                "{} Time to start: {} ({}m)",
                now.format("%H:%M"),
                item.title,
                item.duration
            );
        }
        thread::sleep(Duration::from_secs(args.interval_secs));
    }
}
