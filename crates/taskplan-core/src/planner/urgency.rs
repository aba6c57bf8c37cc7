//! Urgency ranking for work planning.
//!
//! Defines a strict, deterministic total order over tasks. The planner uses
//! it to break ties between equally good plans and to order the final
//! result; it never decides inclusion by itself.
//!
//! Ordering key, most significant first:
//! 1. overdue tasks before everything else
//! 2. priority, descending
//! 3. due date, ascending
//! 4. id, ascending

use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::task::Task;

/// Compare two tasks by urgency relative to `today`. `Less` means `a` is
/// more urgent than `b`.
pub fn compare(a: &Task, b: &Task, today: NaiveDate) -> Ordering {
    b.is_overdue(today)
        .cmp(&a.is_overdue(today))
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| a.due_date.cmp(&b.due_date))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort tasks in place, most urgent first.
pub fn sort_by_urgency(tasks: &mut [Task], today: NaiveDate) {
    tasks.sort_by(|a, b| compare(a, b, today));
}
