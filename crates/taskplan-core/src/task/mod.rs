//! Task types for the task manager.
//!
//! A [`Task`] is the unit of work the planner packs into a time budget.
//! Records serialize with camelCase keys to match the external JSON shape
//! (`dueDate`, `estimatedMinutes`, ...).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Lowest accepted priority value.
pub const PRIORITY_MIN: i32 = 1;
/// Highest accepted priority value.
pub const PRIORITY_MAX: i32 = 5;

/// Task status enumeration.
///
/// Only `Todo` tasks are eligible for planning; `InProgress` and `Done`
/// tasks are excluded before ranking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task has not been started
    Todo,
    /// Task is being worked on
    InProgress,
    /// Task is finished (terminal state)
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "TODO"),
            TaskStatus::InProgress => write!(f, "IN_PROGRESS"),
            TaskStatus::Done => write!(f, "DONE"),
        }
    }
}

/// A unit of work with a time cost, a due date, and a priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (UUID v4, assigned at creation)
    pub id: String,
    /// Task title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Task status
    pub status: TaskStatus,
    /// Calendar due date; may already be in the past (overdue)
    pub due_date: NaiveDate,
    /// Priority 1..=5, higher is more important
    pub priority: i32,
    /// Estimated duration in minutes, always > 0
    pub estimated_minutes: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new TODO task with a fresh id and default priority.
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        let now = Utc::now();
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            due_date,
            priority: 3,
            estimated_minutes: 30,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate field constraints enforced at create/update time.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] naming the offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&self.priority) {
            return Err(ValidationError::InvalidValue {
                field: "priority".to_string(),
                message: format!("must be between {PRIORITY_MIN} and {PRIORITY_MAX}"),
            });
        }
        if self.estimated_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "estimatedMinutes".to_string(),
                message: "must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// Whether the due date has passed relative to `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }
}
