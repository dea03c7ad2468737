use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::column::Column;
use crate::model::ids::TaskId;
use crate::model::snapshot::Snapshot;
use crate::model::task::{Status, Task};

/// Structured result of a snapshot validation, suitable for JSON output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (something that should be fixed).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// A `parent_id` references a task that is not in the snapshot
    #[serde(rename = "orphaned_parent")]
    OrphanedParent { task_id: TaskId, parent_id: TaskId },
    /// The same task id appears more than once
    #[serde(rename = "duplicate_id")]
    DuplicateId { task_id: TaskId, count: usize },
    /// Two or more tasks in one status bucket share an order value
    #[serde(rename = "duplicate_order")]
    DuplicateOrder {
        status_key: Status,
        order: f64,
        tasks: Vec<TaskId>,
    },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Tasks carry a status no column accepts; they are off the board
    #[serde(rename = "missing_column")]
    MissingColumn { status_key: Status, tasks: usize },
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Validate a snapshot against a column list and return structured results.
///
/// Read-only. `columns` should be the full synthesized list (see
/// `board_columns`), otherwise built-in statuses warn spuriously.
///
/// Checks performed:
/// 1. Every `parent_id` resolves to a task in the snapshot
/// 2. No duplicate task ids
/// 3. No duplicate order values within a status bucket
/// 4. Warnings for statuses no column accepts
pub fn check_snapshot(snapshot: &Snapshot, columns: &[Column]) -> CheckResult {
    let mut result = CheckResult::default();

    find_duplicate_ids(snapshot, &mut result);
    find_orphans(snapshot, &mut result);
    find_duplicate_orders(snapshot, &mut result);
    find_missing_columns(snapshot, columns, &mut result);

    result.valid = result.errors.is_empty();
    result
}

// ---------------------------------------------------------------------------
// Individual checks
// ---------------------------------------------------------------------------

fn find_duplicate_ids(snapshot: &Snapshot, result: &mut CheckResult) {
    // The snapshot keeps every record even when ids collide, so the raw
    // list still shows the duplicates the index collapsed.
    let mut counts: HashMap<&TaskId, usize> = HashMap::new();
    for task in snapshot.tasks() {
        *counts.entry(&task.id).or_default() += 1;
    }
    let mut duplicates: Vec<(&TaskId, usize)> =
        counts.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort_by(|a, b| a.0.cmp(b.0));
    for (task_id, count) in duplicates {
        result.errors.push(CheckError::DuplicateId {
            task_id: task_id.clone(),
            count,
        });
    }
}

fn find_orphans(snapshot: &Snapshot, result: &mut CheckResult) {
    for task in snapshot.orphans() {
        if let Some(parent_id) = &task.parent_id {
            result.errors.push(CheckError::OrphanedParent {
                task_id: task.id.clone(),
                parent_id: parent_id.clone(),
            });
        }
    }
}

fn find_duplicate_orders(snapshot: &Snapshot, result: &mut CheckResult) {
    let mut by_status: HashMap<&Status, Vec<&Task>> = HashMap::new();
    for task in snapshot.tasks() {
        by_status.entry(&task.status).or_default().push(task);
    }
    let mut groups: Vec<(&Status, Vec<&Task>)> = by_status.into_iter().collect();
    groups.sort_by(|a, b| a.0.as_key().cmp(b.0.as_key()));

    for (status, mut lane) in groups {
        lane.sort_by(|a, b| a.order.total_cmp(&b.order));
        let mut i = 0;
        while i < lane.len() {
            let mut j = i + 1;
            while j < lane.len() && lane[j].order == lane[i].order {
                j += 1;
            }
            if j - i > 1 {
                result.errors.push(CheckError::DuplicateOrder {
                    status_key: status.clone(),
                    order: lane[i].order,
                    tasks: lane[i..j].iter().map(|t| t.id.clone()).collect(),
                });
            }
            i = j;
        }
    }
}

fn find_missing_columns(snapshot: &Snapshot, columns: &[Column], result: &mut CheckResult) {
    let known: HashSet<&Status> = columns.iter().map(|c| &c.status_key).collect();
    let mut missing: Vec<(&Status, usize)> = Vec::new();
    for task in snapshot.tasks() {
        if !known.contains(&task.status) {
            match missing.iter_mut().find(|(s, _)| *s == &task.status) {
                Some((_, n)) => *n += 1,
                None => missing.push((&task.status, 1)),
            }
        }
    }
    for (status, tasks) in missing {
        result.warnings.push(CheckWarning::MissingColumn {
            status_key: status.clone(),
            tasks,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
