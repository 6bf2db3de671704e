//! Board reconciliation.
//!
//! Pure functions over a task collection. Nothing here mutates its input:
//! every operation returns a fresh `Vec<Task>` so callers can keep the old
//! snapshot for rendering or rollback.
//!
//! The collection is a single flat list across all columns. A column's
//! rendered sequence is the flat list filtered by `status`, and `order` is
//! rewritten to the task's index within its column after every reorder.

use std::collections::HashMap;

use serde::Serialize;

use crate::task::{column_rank, find_task, is_column, task_index, Column, Task, TaskOrder};

/// Resolve the column an id belongs to.
///
/// A column id resolves to itself and a task id to its status. Returns
/// `None` for unknown ids and for tasks whose status is not a configured
/// column; callers treat that as a stale gesture and ignore it.
pub fn locate_container(columns: &[Column], tasks: &[Task], id: &str) -> Option<String> {
    if is_column(columns, id) {
        return Some(id.to_string());
    }
    let task = find_task(tasks, id)?;
    if is_column(columns, &task.status) {
        Some(task.status.clone())
    } else {
        None
    }
}

/// Move `active_id` into the column that `over_id` resolves to.
///
/// Returns `None` when either id is unresolvable or both already share a
/// column; same-column moves are settled at drop time by [`commit_order`].
/// Dropping onto a column appends to the end of the collection. Dropping
/// onto a task inserts just above it, or just below when
/// `is_below_over_item` is set.
pub fn move_across_columns(
    columns: &[Column],
    tasks: &[Task],
    active_id: &str,
    over_id: &str,
    is_below_over_item: bool,
) -> Option<Vec<Task>> {
    let from = locate_container(columns, tasks, active_id)?;
    let to = locate_container(columns, tasks, over_id)?;
    if from == to {
        return None;
    }

    let active_index = task_index(tasks, active_id)?;
    let mut next = tasks.to_vec();
    let mut moved = next.remove(active_index);
    moved.status = to;

    let insert_at = if is_column(columns, over_id) {
        next.len()
    } else {
        task_index(&next, over_id)? + usize::from(is_below_over_item)
    };
    next.insert(insert_at.min(next.len()), moved);

    Some(renumber(&next))
}

/// Array move: remove at `active_index`, insert at `over_index`.
///
/// Out-of-range indices leave the collection as it was.
pub fn commit_order(tasks: &[Task], active_index: usize, over_index: usize) -> Vec<Task> {
    let mut next = tasks.to_vec();
    if active_index >= next.len() || over_index >= next.len() {
        return next;
    }
    let moved = next.remove(active_index);
    next.insert(over_index, moved);
    renumber(&next)
}

/// Index to pass to [`commit_order`] so the active task ends up directly
/// above the hovered one (or directly below when `is_below` is set).
pub fn same_column_target(active_index: usize, over_index: usize, is_below: bool) -> usize {
    let target = over_index + usize::from(is_below);
    if active_index < target {
        target - 1
    } else {
        target
    }
}

/// Rewrite `order` to each task's position within its own column.
pub fn renumber(tasks: &[Task]) -> Vec<Task> {
    let mut next_order: HashMap<&str, i64> = HashMap::new();
    tasks
        .iter()
        .map(|task| {
            let slot = next_order.entry(task.status.as_str()).or_insert(0);
            let mut task = task.clone();
            task.order = *slot;
            *slot += 1;
            task
        })
        .collect()
}

/// Stable sort of a fetched collection by column then backend order.
///
/// Tasks in unknown columns sort last and keep their relative order.
pub fn normalize(columns: &[Column], mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|left, right| {
        column_rank(columns, &left.status)
            .cmp(&column_rank(columns, &right.status))
            .then_with(|| left.order.cmp(&right.order))
    });
    tasks
}

/// Payload for `PUT /tasks/reorder`, one entry per task in collection order.
pub fn reorder_payload(tasks: &[Task]) -> Vec<TaskOrder> {
    renumber(tasks)
        .into_iter()
        .map(|task| TaskOrder {
            id: task.id,
            status: task.status,
            order: task.order,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub column: Column,
    pub tasks: Vec<Task>,
}

/// Per-column task lists in rendering order.
pub fn column_view(columns: &[Column], tasks: &[Task]) -> Vec<ColumnView> {
    columns
        .iter()
        .map(|column| ColumnView {
            column: column.clone(),
            tasks: tasks
                .iter()
                .filter(|task| task.status == column.id)
                .cloned()
                .collect(),
        })
        .collect()
}
