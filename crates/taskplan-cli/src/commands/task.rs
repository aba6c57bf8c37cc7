//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use taskplan_core::storage::task_db::TaskDb;
use taskplan_core::task::{Task, TaskStatus};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due_date: NaiveDate,
        /// Priority 1-5, higher is more important (default: 3)
        #[arg(long, default_value = "3")]
        priority: i32,
        /// Estimated minutes (default: 30)
        #[arg(long, default_value = "30")]
        estimated_minutes: u32,
        /// Task status: todo, in-progress or done (default: todo)
        #[arg(long, default_value = "todo")]
        status: String,
    },
    /// List tasks
    List {
        /// Filter by status (todo, in-progress or done)
        #[arg(long)]
        status: Option<String>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New status
        #[arg(long)]
        status: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due_date: Option<NaiveDate>,
        /// New priority
        #[arg(long)]
        priority: Option<i32>,
        /// New estimated minutes
        #[arg(long)]
        estimated_minutes: Option<u32>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

fn parse_status(value: &str) -> Result<TaskStatus, String> {
    match value.to_ascii_lowercase().as_str() {
        "todo" => Ok(TaskStatus::Todo),
        "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
        "done" => Ok(TaskStatus::Done),
        other => Err(format!("unknown status: {other}")),
    }
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = TaskDb::open()?;

    match action {
        TaskAction::Create {
            title,
            description,
            due_date,
            priority,
            estimated_minutes,
            status,
        } => {
            let mut task = Task::new(title, due_date);
            task.description = description;
            task.priority = priority;
            task.estimated_minutes = estimated_minutes;
            task.status = parse_status(&status)?;
            task.validate()?;

            db.create_task(&task)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { status } => {
            let tasks = match status {
                Some(s) => db.list_tasks_by_status(parse_status(&s)?)?,
                None => db.list_tasks()?,
            };
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => match db.get_task(&id)? {
            Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
            None => println!("Task not found: {id}"),
        },
        TaskAction::Update {
            id,
            title,
            description,
            status,
            due_date,
            priority,
            estimated_minutes,
        } => {
            let mut task = db.get_task(&id)?.ok_or(format!("Task not found: {id}"))?;

            if let Some(t) = title {
                task.title = t;
            }
            if let Some(d) = description {
                task.description = Some(d);
            }
            if let Some(s) = status {
                task.status = parse_status(&s)?;
            }
            if let Some(d) = due_date {
                task.due_date = d;
            }
            if let Some(p) = priority {
                task.priority = p;
            }
            if let Some(e) = estimated_minutes {
                task.estimated_minutes = e;
            }
            task.validate()?;

            db.update_task(&task)?;
            println!("Task updated:");
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            db.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
