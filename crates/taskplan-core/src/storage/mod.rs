pub mod config;
pub mod migrations;
pub mod task_db;

pub use config::Config;
pub use task_db::TaskDb;

use std::path::PathBuf;

/// Returns `~/.config/taskplan[-dev]/` based on TASKPLAN_ENV.
///
/// Set TASKPLAN_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKPLAN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("taskplan-dev")
    } else {
        base_dir.join("taskplan")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
