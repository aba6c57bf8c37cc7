//! SQLite-based storage for tasks.
//!
//! This is the persistence collaborator behind the planner: the planner
//! only ever consumes the pending snapshot via
//! [`TaskSource::pending_tasks`].

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use super::migrations;
use crate::error::DatabaseError;
use crate::planner::TaskSource;
use crate::task::{Task, TaskStatus};

/// Parse task status from database string
fn parse_task_status(status_str: &str) -> TaskStatus {
    match status_str {
        "IN_PROGRESS" => TaskStatus::InProgress,
        "DONE" => TaskStatus::Done,
        _ => TaskStatus::Todo,
    }
}

/// Format task status for database storage
fn format_task_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "TODO",
        TaskStatus::InProgress => "IN_PROGRESS",
        TaskStatus::Done => "DONE",
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a calendar date from ISO text with fallback to today
fn parse_date_fallback(date_str: &str) -> NaiveDate {
    date_str
        .parse::<NaiveDate>()
        .unwrap_or_else(|_| Utc::now().date_naive())
}

/// Build a Task from a database row
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let status_str: String = row.get(3)?;
    let due_date_str: String = row.get(4)?;
    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: parse_task_status(&status_str),
        due_date: parse_date_fallback(&due_date_str),
        priority: row.get(5)?,
        estimated_minutes: row.get(6)?,
        created_at: parse_datetime_fallback(&created_at_str),
        updated_at: parse_datetime_fallback(&updated_at_str),
    })
}

const TASK_COLUMNS: &str = "id, title, description, status, due_date, priority, \
     estimated_minutes, created_at, updated_at";

/// SQLite database for task storage.
pub struct TaskDb {
    conn: Connection,
}

impl TaskDb {
    /// Open the task database at `~/.config/taskplan/taskplan.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .join("taskplan.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Create a new task.
    ///
    /// # Errors
    /// Returns an error if the insert fails (e.g. duplicate id).
    pub fn create_task(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (
                id, title, description, status, due_date, priority,
                estimated_minutes, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                task.id,
                task.title,
                task.description,
                format_task_status(task.status),
                task.due_date.to_string(),
                task.priority,
                task.estimated_minutes,
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a task by ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"
        ))?;
        let task = stmt.query_row(params![id], row_to_task).optional()?;
        Ok(task)
    }

    /// List all tasks, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at ASC"
        ))?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// List tasks in a given status, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_tasks_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE status = ?1 ORDER BY created_at ASC"
        ))?;
        let tasks = stmt
            .query_map(params![format_task_status(status)], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Update an existing task.
    ///
    /// # Errors
    /// Returns [`DatabaseError::NotFound`] if no task has the given id.
    pub fn update_task(&self, task: &Task) -> Result<(), DatabaseError> {
        let rows = self.conn.execute(
            "UPDATE tasks SET
                title = ?2, description = ?3, status = ?4, due_date = ?5,
                priority = ?6, estimated_minutes = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.description,
                format_task_status(task.status),
                task.due_date.to_string(),
                task.priority,
                task.estimated_minutes,
                Utc::now().to_rfc3339(),
            ],
        )?;
        if rows == 0 {
            return Err(DatabaseError::NotFound(task.id.clone()));
        }
        Ok(())
    }

    /// Delete a task. Deleting a missing id is a no-op.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn delete_task(&self, id: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(())
    }
}

impl TaskSource for TaskDb {
    fn pending_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        self.list_tasks_by_status(TaskStatus::Todo)
    }
}
