mod app_config;
pub mod planner_db;

pub use app_config::{AppConfig, NotificationsConfig, RotaConfig};
pub use planner_db::PlannerDb;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/dayflow[-dev]/` based on DAYFLOW_ENV.
///
/// Set DAYFLOW_ENV=dev to use a separate development data directory.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("dayflow-dev")
    } else {
        base_dir.join("dayflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
