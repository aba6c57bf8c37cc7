//! Work-plan command for CLI.

use chrono::Local;
use taskplan_core::planner;
use taskplan_core::storage::task_db::TaskDb;
use taskplan_core::Config;

pub fn run(available_minutes: Option<i32>) -> Result<(), Box<dyn std::error::Error>> {
    let budget = match available_minutes {
        Some(minutes) => minutes,
        None => Config::load_or_default().planner.default_available_minutes as i32,
    };

    let db = TaskDb::open()?;
    let today = Local::now().date_naive();
    let plan = planner::plan_from_source(&db, budget, today)?;

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
