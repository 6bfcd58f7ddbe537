use clap::Subcommand;
use dayflow_core::{
    CoreError, Minutes, Result, SettingsPatch, SettingsStore,
};

use crate::common::open_planner;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the planner settings
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Update planner settings
    Set {
        /// Chill mode (on|off)
        #[arg(long)]
        chill: Option<String>,
        /// Work-day wake time (HH:MM)
        #[arg(long)]
        wake_work: Option<String>,
        /// Off-day wake time (HH:MM)
        #[arg(long)]
        wake_off: Option<String>,
        /// Work-day bedtime (HH:MM)
        #[arg(long)]
        bed_work: Option<String>,
        /// Off-day bedtime (HH:MM)
        #[arg(long)]
        bed_off: Option<String>,
        /// Evening task-minute budget on work days
        #[arg(long)]
        evening_max: Option<u32>,
    },
}

pub fn run(action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show { json } => {
            let planner = open_planner()?;
            let settings = planner.store().settings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("wake (work/off): {} / {}", settings.wake_time_work, settings.wake_time_off);
                println!("bed  (work/off): {} / {}", settings.bed_time_work, settings.bed_time_off);
                println!(
                    "meals: {} / {} / {}",
                    settings.meal_times.breakfast, settings.meal_times.lunch, settings.meal_times.dinner
                );
                println!(
                    "gym: {}m in [{}, {})",
                    settings.routines.gym.duration_minutes,
                    settings.routines.gym.window_start,
                    settings.routines.gym.window_end
                );
                println!(
                    "meal prep: {}m (required: {})",
                    settings.routines.meal_prep.duration_minutes, settings.routines.meal_prep.required
                );
                let categories: Vec<&str> = settings
                    .evening
                    .allowed_categories
                    .iter()
                    .map(|c| c.as_str())
                    .collect();
                println!(
                    "evening: {}m budget, categories: {}",
                    settings.evening.max_duration_minutes,
                    categories.join(", ")
                );
                println!("chill mode: {}", settings.chill_mode_active);
            }
            Ok(())
        }
        SettingsAction::Set {
            chill,
            wake_work,
            wake_off,
            bed_work,
            bed_off,
            evening_max,
        } => {
            let planner = open_planner()?;
            let mut current = planner.store().settings()?;

            let patch = SettingsPatch {
                chill_mode_active: chill.as_deref().map(parse_on_off).transpose()?,
                wake_time_work: parse_time_opt(wake_work.as_deref())?,
                wake_time_off: parse_time_opt(wake_off.as_deref())?,
                bed_time_work: parse_time_opt(bed_work.as_deref())?,
                bed_time_off: parse_time_opt(bed_off.as_deref())?,
                evening: evening_max.map(|max| {
                    current.evening.max_duration_minutes = max;
                    current.evening.clone()
                }),
                ..Default::default()
            };
            planner.store().update_settings(patch)?;
            println!("Settings updated");
            Ok(())
        }
    }
}

fn parse_on_off(value: &str) -> Result<bool> {
    match value {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(CoreError::Custom(format!(
            "expected 'on' or 'off', got '{other}'"
        ))),
    }
}

fn parse_time_opt(value: Option<&str>) -> Result<Option<Minutes>> {
    value.map(|v| Minutes::parse(v).map_err(CoreError::from)).transpose()
}
