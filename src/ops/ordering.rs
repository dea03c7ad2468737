use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::ids::TaskId;
use crate::model::snapshot::Snapshot;
use crate::model::task::{Priority, Status, Task};

/// Spacing used when appending at a boundary and when renumbering a scope.
pub const ORDER_STEP: f64 = 1024.0;

/// Below this gap, midpoint insertion risks ties; the scope is renumbered.
pub const MIN_GAP: f64 = 1e-6;

/// Which tasks the moved task must stay order-distinct against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderScope {
    /// Neighbors drawn from the target's status bucket (board lanes)
    SameStatusOnly,
    /// Neighbors drawn from the whole snapshot (flat list)
    Any,
}

/// Which side of the target the task lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Before,
    After,
}

/// The planned outcome of one reorder gesture.
///
/// A plan is a request, not a commit: the external collaborator applies it
/// (and `renumber` with it, atomically) and re-emits a snapshot. It stays
/// free to renumber again on a rare concurrent collision.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPlan {
    pub task: TaskId,
    pub target: TaskId,
    pub scope: ReorderScope,
    /// New order for the moved task, strictly between its new neighbors
    pub new_order: f64,
    /// Set when the target lives in a different status bucket
    pub new_status: Option<Status>,
    /// Scope-wide reassignments when precision ran out, excluding the mover
    pub renumber: Vec<(TaskId, f64)>,
}

// ---------------------------------------------------------------------------
// Reorder planning
// ---------------------------------------------------------------------------

/// Plan moving `task_id` immediately before/after `target_id`.
///
/// Reordering couples with status assignment: when the target sits in a
/// different status bucket, the plan carries `new_status` so a card dropped
/// onto another card adopts its column. A vanished task or target is a
/// [`EngineError::StaleReference`]; gesture resolution turns that into a
/// silent no-op because a fresh snapshot is imminent.
pub fn plan_reorder(
    snapshot: &Snapshot,
    task_id: &TaskId,
    target_id: &TaskId,
    placement: Placement,
    scope: ReorderScope,
) -> Result<ReorderPlan, EngineError> {
    if task_id == target_id {
        return Err(EngineError::InvalidArgument(
            "cannot reorder a task relative to itself".to_string(),
        ));
    }
    let task = snapshot
        .get(task_id)
        .ok_or_else(|| EngineError::StaleReference(task_id.clone()))?;
    let target = snapshot
        .get(target_id)
        .ok_or_else(|| EngineError::StaleReference(target_id.clone()))?;

    let new_status = (target.status != task.status).then(|| target.status.clone());

    // The comparison set: everything the new order must stay distinct
    // against, sorted by order, without the task being moved.
    let mut lane: Vec<&Task> = snapshot
        .tasks()
        .iter()
        .filter(|t| t.id != *task_id)
        .filter(|t| match scope {
            ReorderScope::SameStatusOnly => t.status == target.status,
            ReorderScope::Any => true,
        })
        .collect();
    lane.sort_by(|a, b| a.order.total_cmp(&b.order));

    let target_pos = lane
        .iter()
        .position(|t| t.id == *target_id)
        .ok_or_else(|| EngineError::StaleReference(target_id.clone()))?;
    let insert_pos = match placement {
        Placement::Before => target_pos,
        Placement::After => target_pos + 1,
    };

    let prev = insert_pos.checked_sub(1).and_then(|i| lane.get(i).copied());
    let next = lane.get(insert_pos).copied();

    let (new_order, renumber) = match (prev, next) {
        (Some(prev), Some(next)) => {
            let gap = next.order - prev.order;
            let mid = prev.order + gap / 2.0;
            // A midpoint that rounds onto either neighbor would break order
            // totality, so renumber when the gap is exhausted.
            if gap > MIN_GAP && mid > prev.order && mid < next.order {
                (mid, Vec::new())
            } else {
                renumber_with_insertion(&lane, insert_pos)
            }
        }
        (Some(prev), None) => {
            let order = prev.order + ORDER_STEP;
            if order > prev.order {
                (order, Vec::new())
            } else {
                renumber_with_insertion(&lane, insert_pos)
            }
        }
        (None, Some(next)) => {
            let order = next.order - ORDER_STEP;
            if order < next.order {
                (order, Vec::new())
            } else {
                renumber_with_insertion(&lane, insert_pos)
            }
        }
        // The lane always contains the target
        (None, None) => (ORDER_STEP, Vec::new()),
    };

    Ok(ReorderPlan {
        task: task_id.clone(),
        target: target_id.clone(),
        scope,
        new_order,
        new_status,
        renumber,
    })
}

/// Reassign the whole lane to evenly spaced steps, leaving a slot for the
/// inserted task. Returns the mover's order and the lane reassignments.
fn renumber_with_insertion(lane: &[&Task], insert_pos: usize) -> (f64, Vec<(TaskId, f64)>) {
    let mut renumber = Vec::with_capacity(lane.len());
    let mut new_order = 0.0;
    let mut slot = 1u32;
    for (pos, task) in lane.iter().enumerate() {
        if pos == insert_pos {
            new_order = f64::from(slot) * ORDER_STEP;
            slot += 1;
        }
        renumber.push((task.id.clone(), f64::from(slot) * ORDER_STEP));
        slot += 1;
    }
    if insert_pos >= lane.len() {
        new_order = f64::from(slot) * ORDER_STEP;
    }
    (new_order, renumber)
}

// ---------------------------------------------------------------------------
// Derived sort modes
// ---------------------------------------------------------------------------

/// View-only orderings applied to sibling groups. None of these touch the
/// stored `order` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Manual,
    Priority,
    StartDate,
    DueDate,
}

/// Stable, non-destructive sort of one sibling group.
pub fn sort_tasks(tasks: &mut [&Task], mode: SortMode) {
    match mode {
        SortMode::Manual => tasks.sort_by(|a, b| a.order.total_cmp(&b.order)),
        SortMode::Priority => tasks.sort_by_key(|t| priority_rank(t.priority)),
        SortMode::StartDate => {
            tasks.sort_by(|a, b| cmp_dates_missing_last(a.start_date, b.start_date))
        }
        SortMode::DueDate => tasks.sort_by(|a, b| cmp_dates_missing_last(a.due_date, b.due_date)),
    }
}

/// Urgent sorts first; missing or unrecognized priority sorts last.
fn priority_rank(priority: Option<Priority>) -> u8 {
    match priority {
        Some(Priority::Urgent) => 0,
        Some(Priority::High) => 1,
        Some(Priority::Medium) => 2,
        Some(Priority::Low) => 3,
        None => 4,
    }
}

/// Undated tasks push to the end.
fn cmp_dates_missing_last(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, status: Status, order: f64) -> Task {
        Task::new(TaskId::new(id), format!("Task {}", id), status, order)
    }

    fn board_snapshot() -> Snapshot {
        Snapshot::new(vec![
            task("a", Status::Todo, 5.0),
            task("ip-1", Status::InProgress, 8.0),
            task("b", Status::InProgress, 10.0),
            task("other", Status::Todo, 11.0),
            task("ip-2", Status::InProgress, 12.0),
        ])
    }

    #[test]
    fn test_midpoint_between_neighbors() {
        let snap = Snapshot::new(vec![
            task("x", Status::Todo, 1024.0),
            task("y", Status::Todo, 2048.0),
            task("z", Status::Todo, 3072.0),
        ]);
        let plan = plan_reorder(
            &snap,
            &TaskId::new("z"),
            &TaskId::new("y"),
            Placement::Before,
            ReorderScope::SameStatusOnly,
        )
        .unwrap();
        assert_eq!(plan.new_order, 1536.0);
        assert_eq!(plan.new_status, None);
        assert!(plan.renumber.is_empty());
    }

    #[test]
    fn test_boundary_insertion_steps_past_the_edge() {
        let snap = Snapshot::new(vec![
            task("x", Status::Todo, 10.0),
            task("y", Status::Todo, 20.0),
        ]);
        let after_last = plan_reorder(
            &snap,
            &TaskId::new("x"),
            &TaskId::new("y"),
            Placement::After,
            ReorderScope::Any,
        )
        .unwrap();
        assert_eq!(after_last.new_order, 20.0 + ORDER_STEP);

        let before_first = plan_reorder(
            &snap,
            &TaskId::new("y"),
            &TaskId::new("x"),
            Placement::Before,
            ReorderScope::Any,
        )
        .unwrap();
        assert_eq!(before_first.new_order, 10.0 - ORDER_STEP);
    }

    #[test]
    fn test_cross_bucket_drop_couples_status_and_order() {
        let snap = board_snapshot();
        let plan = plan_reorder(
            &snap,
            &TaskId::new("a"),
            &TaskId::new("b"),
            Placement::After,
            ReorderScope::Any,
        )
        .unwrap();
        assert_eq!(plan.new_status, Some(Status::InProgress));
        // Strictly inside the in_progress bucket gap around the target
        assert!(plan.new_order > 10.0 && plan.new_order < 12.0);
    }

    #[test]
    fn test_same_status_scope_ignores_other_buckets() {
        let snap = board_snapshot();
        let plan = plan_reorder(
            &snap,
            &TaskId::new("a"),
            &TaskId::new("b"),
            Placement::After,
            ReorderScope::SameStatusOnly,
        )
        .unwrap();
        // The todo task at order 11 is not in the lane, so the midpoint is
        // taken against ip-2 directly
        assert_eq!(plan.new_order, 11.0);
        assert_eq!(plan.new_status, Some(Status::InProgress));
    }

    #[test]
    fn test_exhausted_gap_triggers_renumber() {
        let snap = Snapshot::new(vec![
            task("x", Status::Todo, 1.0),
            task("y", Status::Todo, 1.0 + 1e-9),
            task("z", Status::Todo, 50.0),
        ]);
        let plan = plan_reorder(
            &snap,
            &TaskId::new("z"),
            &TaskId::new("x"),
            Placement::After,
            ReorderScope::SameStatusOnly,
        )
        .unwrap();
        assert_eq!(plan.renumber.len(), 2);
        let x_order = plan
            .renumber
            .iter()
            .find(|(id, _)| id.as_str() == "x")
            .map(|(_, o)| *o)
            .unwrap();
        let y_order = plan
            .renumber
            .iter()
            .find(|(id, _)| id.as_str() == "y")
            .map(|(_, o)| *o)
            .unwrap();
        // Mover lands strictly between its renumbered neighbors
        assert!(x_order < plan.new_order && plan.new_order < y_order);
        assert_eq!(x_order, ORDER_STEP);
        assert_eq!(plan.new_order, 2.0 * ORDER_STEP);
        assert_eq!(y_order, 3.0 * ORDER_STEP);
    }

    #[test]
    fn test_after_b_equals_before_b_successor() {
        let snap = Snapshot::new(vec![
            task("a", Status::Todo, 1.0),
            task("b", Status::Todo, 2.0),
            task("c", Status::Todo, 3.0),
        ]);
        let after_b = plan_reorder(
            &snap,
            &TaskId::new("a"),
            &TaskId::new("b"),
            Placement::After,
            ReorderScope::Any,
        )
        .unwrap();
        let before_c = plan_reorder(
            &snap,
            &TaskId::new("a"),
            &TaskId::new("c"),
            Placement::Before,
            ReorderScope::Any,
        )
        .unwrap();
        assert_eq!(after_b.new_order, before_c.new_order);
    }

    #[test]
    fn test_reorder_onto_self_is_invalid() {
        let snap = board_snapshot();
        let err = plan_reorder(
            &snap,
            &TaskId::new("a"),
            &TaskId::new("a"),
            Placement::After,
            ReorderScope::Any,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[test]
    fn test_stale_target_is_reported() {
        let snap = board_snapshot();
        let err = plan_reorder(
            &snap,
            &TaskId::new("a"),
            &TaskId::new("deleted"),
            Placement::After,
            ReorderScope::Any,
        )
        .unwrap_err();
        assert_eq!(err, EngineError::StaleReference(TaskId::new("deleted")));
    }

    #[test]
    fn test_sort_modes_never_touch_stored_order() {
        let snap = board_snapshot();
        let before: Vec<f64> = snap.tasks().iter().map(|t| t.order).collect();

        let mut view: Vec<&Task> = snap.tasks().iter().collect();
        sort_tasks(&mut view, SortMode::Priority);
        sort_tasks(&mut view, SortMode::DueDate);
        sort_tasks(&mut view, SortMode::StartDate);

        let after: Vec<f64> = snap.tasks().iter().map(|t| t.order).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_priority_sort_urgent_first_missing_last() {
        let mut urgent = task("u", Status::Todo, 4.0);
        urgent.priority = Some(Priority::Urgent);
        let mut low = task("l", Status::Todo, 1.0);
        low.priority = Some(Priority::Low);
        let none = task("n", Status::Todo, 2.0);
        let mut high = task("h", Status::Todo, 3.0);
        high.priority = Some(Priority::High);

        let tasks = vec![urgent, low, none, high];
        let mut view: Vec<&Task> = tasks.iter().collect();
        sort_tasks(&mut view, SortMode::Priority);
        let ids: Vec<&str> = view.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["u", "h", "l", "n"]);
    }

    #[test]
    fn test_date_sort_pushes_undated_to_the_end() {
        let mut early = task("early", Status::Todo, 3.0);
        early.due_date = Some("2025-02-01T00:00:00Z".parse().unwrap());
        let mut late = task("late", Status::Todo, 1.0);
        late.due_date = Some("2025-06-01T00:00:00Z".parse().unwrap());
        let undated = task("undated", Status::Todo, 2.0);

        let tasks = vec![late, undated, early];
        let mut view: Vec<&Task> = tasks.iter().collect();
        sort_tasks(&mut view, SortMode::DueDate);
        let ids: Vec<&str> = view.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "undated"]);
    }
}
