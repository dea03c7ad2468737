use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::EngineError;
use crate::model::column::Column;
use crate::model::ids::TaskId;
use crate::model::snapshot::Snapshot;
use crate::model::task::{Status, Task};
use crate::ops::ordering::{Placement, ReorderScope, plan_reorder};
use crate::sync::requests::MutationRequest;

// ---------------------------------------------------------------------------
// Column synthesis
// ---------------------------------------------------------------------------

/// The full column list: custom records as given, plus synthesized defaults
/// for every built-in key without one, sorted by position.
pub fn board_columns(custom: &[Column]) -> Vec<Column> {
    let mut columns: Vec<Column> = custom.to_vec();
    for status in Status::built_in() {
        if !columns.iter().any(|c| c.status_key == status)
            && let Some(column) = Column::built_in_default(&status)
        {
            columns.push(column);
        }
    }
    columns.sort_by_key(|c| c.position);
    columns
}

/// Group the visible tasks into board lanes, one per column in column order,
/// each lane ordered by `order` ascending.
///
/// A task whose status matches no column is left off the board entirely; the
/// snapshot check reports those.
pub fn board_view<'a>(
    columns: &[Column],
    snapshot: &'a Snapshot,
    visible: &[TaskId],
) -> IndexMap<Status, Vec<&'a Task>> {
    let visible_set: HashSet<&TaskId> = visible.iter().collect();
    let mut lanes: IndexMap<Status, Vec<&Task>> = columns
        .iter()
        .map(|c| (c.status_key.clone(), Vec::new()))
        .collect();
    for task in snapshot.tasks() {
        if !visible_set.contains(&task.id) {
            continue;
        }
        if let Some(lane) = lanes.get_mut(&task.status) {
            lane.push(task);
        }
    }
    for lane in lanes.values_mut() {
        lane.sort_by(|a, b| a.order.total_cmp(&b.order));
    }
    lanes
}

/// Per-column task counts for header badges.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct BoardStats {
    pub per_column: IndexMap<Status, usize>,
    pub total: usize,
}

pub fn board_stats(columns: &[Column], snapshot: &Snapshot, visible: &[TaskId]) -> BoardStats {
    let mut stats = BoardStats::default();
    for (status, lane) in board_view(columns, snapshot, visible) {
        stats.total += lane.len();
        stats.per_column.insert(status, lane.len());
    }
    stats
}

// ---------------------------------------------------------------------------
// Drop gestures
// ---------------------------------------------------------------------------

/// A drop gesture reported by the view layer.
#[derive(Debug, Clone, PartialEq)]
pub enum DropGesture {
    /// Dropped onto another card: reorder, adopting the target's status
    OnTask {
        task: TaskId,
        target: TaskId,
        placement: Placement,
        scope: ReorderScope,
    },
    /// Dropped onto a column body: bare status change, no reordering
    OnColumn { task: TaskId, status: Status },
}

/// Resolve a gesture into the mutation requests it implies.
///
/// A stale gesture (the task or target vanished between render and drop)
/// resolves to no requests at all, since a fresh snapshot is already on its
/// way. Contract violations (dropping a task onto itself) still surface as
/// [`EngineError::InvalidArgument`].
pub fn resolve_drop(
    snapshot: &Snapshot,
    gesture: DropGesture,
) -> Result<Vec<MutationRequest>, EngineError> {
    match gesture {
        DropGesture::OnTask {
            task,
            target,
            placement,
            scope,
        } => match plan_reorder(snapshot, &task, &target, placement, scope) {
            Ok(plan) => Ok(vec![plan.into()]),
            Err(EngineError::StaleReference(_)) => Ok(Vec::new()),
            Err(err) => Err(err),
        },
        DropGesture::OnColumn { task, status } => {
            let current = match snapshot.get(&task) {
                Some(t) => t,
                None => return Ok(Vec::new()),
            };
            if current.status == status {
                return Ok(Vec::new());
            }
            Ok(vec![MutationRequest::StatusChange { task, status }])
        }
    }
}

// ---------------------------------------------------------------------------
// Column deletion
// ---------------------------------------------------------------------------

/// Plan deleting a column: every task of that status migrates to `fallback`.
///
/// The migration set covers the whole snapshot, not just the currently
/// visible tasks. All contract checks reject before any request exists.
pub fn plan_column_removal(
    columns: &[Column],
    snapshot: &Snapshot,
    status_key: &Status,
    fallback: &Status,
) -> Result<MutationRequest, EngineError> {
    if status_key.is_built_in() {
        return Err(EngineError::InvalidArgument(format!(
            "built-in column '{}' cannot be deleted",
            status_key
        )));
    }
    if status_key == fallback {
        return Err(EngineError::InvalidArgument(
            "a column cannot migrate onto itself".to_string(),
        ));
    }
    if !columns.iter().any(|c| c.status_key == *status_key) {
        return Err(EngineError::InvalidArgument(format!(
            "unknown column '{}'",
            status_key
        )));
    }
    if !columns.iter().any(|c| c.status_key == *fallback) {
        return Err(EngineError::InvalidArgument(format!(
            "unknown fallback column '{}'",
            fallback
        )));
    }

    let mut migrating: Vec<&Task> = snapshot
        .tasks()
        .iter()
        .filter(|t| t.status == *status_key)
        .collect();
    migrating.sort_by(|a, b| a.order.total_cmp(&b.order));

    Ok(MutationRequest::ColumnMigration {
        status_key: status_key.clone(),
        fallback: fallback.clone(),
        tasks: migrating.into_iter().map(|t| t.id.clone()).collect(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
