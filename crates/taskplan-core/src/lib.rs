//! # Taskplan Core Library
//!
//! This library provides the core business logic for the Taskplan task
//! manager. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary over this library.
//!
//! ## Architecture
//!
//! - **Task Model**: Task records with status, due date, priority, and a
//!   time estimate, validated at create/update time
//! - **Storage**: SQLite-based task storage and TOML-based configuration
//! - **Planner**: A pure, deterministic work planner that packs pending
//!   tasks into a caller-supplied minute budget (exact 0/1 knapsack with
//!   urgency-biased tie-breaking)
//!
//! ## Key Components
//!
//! - [`Task`]: The unit of work
//! - [`TaskDb`]: Task persistence
//! - [`Config`]: Application configuration management
//! - [`plan_work`]: The work-plan computation

pub mod error;
pub mod planner;
pub mod storage;
pub mod task;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use planner::{plan_from_source, plan_work, TaskSource, WorkPlan};
pub use storage::{Config, TaskDb};
pub use task::{Task, TaskStatus};
