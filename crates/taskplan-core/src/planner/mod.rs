//! Work planner: pack pending tasks into a caller-supplied time budget.
//!
//! Pipeline over one immutable snapshot of pending tasks:
//! urgency ranking (sort) -> capacity selector (optimize) -> plan assembly
//! (format). Pure and synchronous; no component holds state between
//! invocations, so concurrent calls against independent snapshots are safe
//! without locking. Nothing here mutates or persists a task.
//!
//! Bounding `available_minutes` bounds the selector's table and therefore
//! the runtime.

pub mod knapsack;
pub mod urgency;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, DatabaseError, ValidationError};
use crate::task::{Task, TaskStatus};

/// The computed work plan: time accounting plus the selected tasks in
/// urgency order. Wire shape:
/// `{ "totalMinutes": .., "remainingMinutes": .., "tasks": [..] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPlan {
    /// Sum of estimated minutes over the selected tasks
    pub total_minutes: u32,
    /// Budget left over, always >= 0
    pub remaining_minutes: u32,
    /// Selected tasks, most urgent first
    pub tasks: Vec<Task>,
}

/// Read capability supplying the pending-task snapshot. The planner
/// depends on nothing else from the persistence collaborator.
pub trait TaskSource {
    /// Return all tasks whose status is `TODO`, fully materialized.
    ///
    /// # Errors
    /// Propagates storage failures unchanged; the planner does not retry.
    fn pending_tasks(&self) -> Result<Vec<Task>, DatabaseError>;
}

/// Compute a work plan from a snapshot of tasks.
///
/// Non-`TODO` tasks are excluded before ranking. `available_minutes` must
/// be positive; zero or negative is a rejected input, not an empty plan.
///
/// # Errors
/// Returns [`ValidationError::NonPositiveBudget`] when
/// `available_minutes <= 0`.
pub fn plan_work(
    snapshot: &[Task],
    available_minutes: i32,
    today: NaiveDate,
) -> Result<WorkPlan, ValidationError> {
    if available_minutes <= 0 {
        return Err(ValidationError::NonPositiveBudget);
    }
    let budget = available_minutes as u32;

    let mut eligible: Vec<Task> = snapshot
        .iter()
        .filter(|task| task.status == TaskStatus::Todo)
        .cloned()
        .collect();
    urgency::sort_by_urgency(&mut eligible, today);

    let selection = knapsack::select_within_budget(&eligible, budget);
    let chosen: HashSet<&str> = selection.chosen.iter().map(String::as_str).collect();

    // `eligible` is already in urgency order; keeping the chosen subset in
    // place is the presentation order
    let tasks: Vec<Task> = eligible
        .into_iter()
        .filter(|task| chosen.contains(task.id.as_str()))
        .collect();

    Ok(WorkPlan {
        total_minutes: selection.total_minutes,
        remaining_minutes: budget - selection.total_minutes,
        tasks,
    })
}

/// Plan against a [`TaskSource`], the way the CLI drives it.
///
/// # Errors
/// Propagates storage failures and the budget rejection.
pub fn plan_from_source<S: TaskSource>(
    source: &S,
    available_minutes: i32,
    today: NaiveDate,
) -> Result<WorkPlan, CoreError> {
    let snapshot = source.pending_tasks()?;
    Ok(plan_work(&snapshot, available_minutes, today)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()
    }

    fn make_task(
        id: &str,
        title: &str,
        status: TaskStatus,
        due_date: NaiveDate,
        priority: i32,
        estimated_minutes: u32,
    ) -> Task {
        let mut task = Task::new(title, due_date);
        task.id = id.to_string();
        task.status = status;
        task.priority = priority;
        task.estimated_minutes = estimated_minutes;
        task
    }

    #[test]
    fn overdue_high_priority_chosen_over_future_low_priority() {
        let today = today();
        let snapshot = vec![
            make_task(
                "1",
                "Overdue high priority",
                TaskStatus::Todo,
                today - Duration::days(1),
                5,
                60,
            ),
            make_task(
                "2",
                "Future low priority",
                TaskStatus::Todo,
                today + Duration::days(7),
                1,
                60,
            ),
        ];

        let plan = plan_work(&snapshot, 60, today).unwrap();

        assert_eq!(plan.total_minutes, 60);
        assert_eq!(plan.remaining_minutes, 0);
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].title, "Overdue high priority");
    }

    #[test]
    fn smaller_tasks_chosen_when_large_does_not_fit() {
        let today = today();
        let snapshot = vec![
            make_task("1", "Big task", TaskStatus::Todo, today, 5, 90),
            make_task("2", "Small task 1", TaskStatus::Todo, today, 3, 30),
            make_task("3", "Small task 2", TaskStatus::Todo, today, 3, 20),
        ];

        let plan = plan_work(&snapshot, 50, today).unwrap();

        assert_eq!(plan.total_minutes, 50);
        assert_eq!(plan.remaining_minutes, 0);
        assert_eq!(plan.tasks.len(), 2);

        let titles: Vec<&str> = plan.tasks.iter().map(|t| t.title.as_str()).collect();
        assert!(titles.contains(&"Small task 1"));
        assert!(titles.contains(&"Small task 2"));
        assert!(!titles.contains(&"Big task"));
    }

    #[test]
    fn empty_plan_when_nothing_fits() {
        let today = today();
        let snapshot = vec![make_task("1", "Too big", TaskStatus::Todo, today, 5, 120)];

        let plan = plan_work(&snapshot, 30, today).unwrap();

        assert_eq!(plan.total_minutes, 0);
        assert_eq!(plan.remaining_minutes, 30);
        assert!(plan.tasks.is_empty());
    }

    #[test]
    fn empty_plan_when_no_eligible_tasks() {
        let plan = plan_work(&[], 100, today()).unwrap();

        assert_eq!(plan.total_minutes, 0);
        assert_eq!(plan.remaining_minutes, 100);
        assert!(plan.tasks.is_empty());
    }

    #[test]
    fn zero_and_negative_budgets_are_rejected() {
        let err = plan_work(&[], 0, today()).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveBudget);
        assert_eq!(err.to_string(), "availableMinutes must be > 0");

        assert!(plan_work(&[], -30, today()).is_err());
    }

    #[test]
    fn non_todo_tasks_are_excluded_before_ranking() {
        let today = today();
        let snapshot = vec![
            make_task("1", "Started", TaskStatus::InProgress, today, 5, 30),
            make_task("2", "Finished", TaskStatus::Done, today, 5, 30),
            make_task("3", "Pending", TaskStatus::Todo, today, 1, 30),
        ];

        let plan = plan_work(&snapshot, 60, today).unwrap();

        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].id, "3");
        assert_eq!(plan.total_minutes, 30);
    }

    #[test]
    fn selected_tasks_come_back_in_urgency_order() {
        let today = today();
        let snapshot = vec![
            make_task("low", "Low", TaskStatus::Todo, today + Duration::days(5), 2, 20),
            make_task("overdue", "Overdue", TaskStatus::Todo, today - Duration::days(2), 1, 20),
            make_task("high", "High", TaskStatus::Todo, today + Duration::days(5), 5, 20),
        ];

        let plan = plan_work(&snapshot, 60, today).unwrap();

        let ids: Vec<&str> = plan.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["overdue", "high", "low"]);
    }

    #[test]
    fn work_plan_serializes_with_wire_field_names() {
        let plan = plan_work(&[], 45, today()).unwrap();
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["totalMinutes"], 0);
        assert_eq!(json["remainingMinutes"], 45);
        assert!(json["tasks"].as_array().unwrap().is_empty());
    }

    #[test]
    fn plan_from_source_pulls_the_pending_snapshot() {
        struct FixedSource(Vec<Task>);
        impl TaskSource for FixedSource {
            fn pending_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
                Ok(self.0.clone())
            }
        }

        let today = today();
        let source = FixedSource(vec![make_task(
            "1",
            "Only task",
            TaskStatus::Todo,
            today,
            3,
            25,
        )]);

        let plan = plan_from_source(&source, 60, today).unwrap();
        assert_eq!(plan.total_minutes, 25);
        assert_eq!(plan.remaining_minutes, 35);
    }

    #[test]
    fn plan_from_source_propagates_storage_failures() {
        struct BrokenSource;
        impl TaskSource for BrokenSource {
            fn pending_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
                Err(DatabaseError::QueryFailed("disk gone".to_string()))
            }
        }

        let err = plan_from_source(&BrokenSource, 60, today()).unwrap_err();
        assert!(matches!(err, CoreError::Database(_)));
    }

    // Exhaustive subset check for small pools
    fn brute_force_best(minutes: &[u32], budget: u32) -> u32 {
        let mut best = 0u32;
        for mask in 0..(1u32 << minutes.len()) {
            let total: u64 = minutes
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &m)| m as u64)
                .sum();
            if total <= budget as u64 {
                best = best.max(total as u32);
            }
        }
        best
    }

    fn arb_snapshot() -> impl Strategy<Value = Vec<(u32, i32, i64, bool)>> {
        // (estimated_minutes, priority, due-date offset in days, eligible)
        prop::collection::vec((1u32..=60, 1i32..=5, -5i64..=10, prop::bool::ANY), 0..8)
    }

    proptest! {
        #[test]
        fn plan_satisfies_accounting_and_optimality(
            entries in arb_snapshot(),
            budget in 1i32..=150,
        ) {
            let today = today();
            let snapshot: Vec<Task> = entries
                .iter()
                .enumerate()
                .map(|(i, &(minutes, priority, offset, eligible))| {
                    make_task(
                        &format!("t{i}"),
                        &format!("Task {i}"),
                        if eligible { TaskStatus::Todo } else { TaskStatus::Done },
                        today + Duration::days(offset),
                        priority,
                        minutes,
                    )
                })
                .collect();

            let plan = plan_work(&snapshot, budget, today).unwrap();

            // Accounting identity and budget bound
            prop_assert_eq!(
                plan.total_minutes + plan.remaining_minutes,
                budget as u32
            );
            prop_assert!(plan.total_minutes <= budget as u32);

            // Totals match the returned tasks
            let sum: u32 = plan.tasks.iter().map(|t| t.estimated_minutes).sum();
            prop_assert_eq!(sum, plan.total_minutes);

            // Only eligible tasks are selected
            prop_assert!(plan.tasks.iter().all(|t| t.status == TaskStatus::Todo));

            // Optimal against brute force over the eligible pool
            let eligible_minutes: Vec<u32> = snapshot
                .iter()
                .filter(|t| t.status == TaskStatus::Todo)
                .map(|t| t.estimated_minutes)
                .collect();
            prop_assert_eq!(
                plan.total_minutes,
                brute_force_best(&eligible_minutes, budget as u32)
            );

            // Determinism: a second run returns the identical selection
            let again = plan_work(&snapshot, budget, today).unwrap();
            let ids: Vec<&str> = plan.tasks.iter().map(|t| t.id.as_str()).collect();
            let again_ids: Vec<&str> = again.tasks.iter().map(|t| t.id.as_str()).collect();
            prop_assert_eq!(ids, again_ids);
        }
    }
}
