use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::model::ids::TaskId;
use crate::model::snapshot::Snapshot;
use crate::model::task::Task;

/// A contiguous run of day columns inside one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    pub days: usize,
}

/// The bar a scheduled task draws across the day grid. Both bounds are
/// day-column indices, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineBar {
    pub start_day: usize,
    pub end_day: usize,
}

impl TimelineBar {
    pub fn duration_days(&self) -> usize {
        self.end_day - self.start_day + 1
    }
}

/// One timeline row. An expanded subtask without a schedule still occupies
/// a row; it just draws no bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub id: TaskId,
    pub depth: usize,
    pub bar: Option<TimelineBar>,
}

/// The computed day-grid layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineView {
    /// First day column
    pub start: NaiveDate,
    /// Last day column, padded to the end of its month
    pub end: NaiveDate,
    pub days: usize,
    pub months: Vec<MonthGroup>,
    pub rows: Vec<TimelineRow>,
}

/// Project the visible set onto the timeline. `None` when nothing visible
/// has a usable schedule.
///
/// The date range spans every visible scheduled task whether or not its row
/// is currently rendered, so the header stays stable under expand/collapse.
/// Rows hold scheduled roots and, beneath expanded ancestors, their visible
/// subtasks.
pub fn project_timeline(
    snapshot: &Snapshot,
    visible: &[TaskId],
    expanded: &HashSet<TaskId>,
) -> Option<TimelineView> {
    let visible_set: HashSet<&TaskId> = visible.iter().collect();

    let mut min_start: Option<NaiveDate> = None;
    let mut max_due: Option<NaiveDate> = None;
    for task in snapshot.tasks() {
        if !visible_set.contains(&task.id) {
            continue;
        }
        if let Some((start, due)) = schedule(task) {
            min_start = Some(min_start.map_or(start, |d| d.min(start)));
            max_due = Some(max_due.map_or(due, |d| d.max(due)));
        }
    }
    let start = min_start?;
    let end = end_of_month(max_due?);
    let days = (end - start).num_days() as usize + 1;

    let mut months: Vec<MonthGroup> = Vec::new();
    for day in start.iter_days().take(days) {
        match months.last_mut() {
            Some(group) if group.year == day.year() && group.month == day.month() => {
                group.days += 1;
            }
            _ => months.push(MonthGroup {
                year: day.year(),
                month: day.month(),
                days: 1,
            }),
        }
    }

    let mut rows = Vec::new();
    for root in snapshot.roots() {
        if visible_set.contains(&root.id) && schedule(root).is_some() {
            collect_rows(snapshot, root, &visible_set, expanded, start, 0, &mut rows);
        }
    }

    Some(TimelineView {
        start,
        end,
        days,
        months,
        rows,
    })
}

fn collect_rows(
    snapshot: &Snapshot,
    task: &Task,
    visible: &HashSet<&TaskId>,
    expanded: &HashSet<TaskId>,
    range_start: NaiveDate,
    depth: usize,
    rows: &mut Vec<TimelineRow>,
) {
    // Rendered tasks are a subset of the visible set, so a schedule here is
    // always inside the computed range.
    let bar = schedule(task).map(|(start, due)| TimelineBar {
        start_day: (start - range_start).num_days() as usize,
        end_day: (due - range_start).num_days() as usize,
    });
    rows.push(TimelineRow {
        id: task.id.clone(),
        depth,
        bar,
    });

    if !expanded.contains(&task.id) {
        return;
    }
    for child in snapshot.children(&task.id) {
        if visible.contains(&child.id) {
            collect_rows(
                snapshot,
                child,
                visible,
                expanded,
                range_start,
                depth + 1,
                rows,
            );
        }
    }
}

/// Day-granular schedule; `None` when undated or when the due date precedes
/// the start date (malformed, treated as unscheduled).
fn schedule(task: &Task) -> Option<(NaiveDate, NaiveDate)> {
    let start = task.start_date?.date_naive();
    let due = task.due_date?.date_naive();
    (due >= start).then_some((start, due))
}

/// Last day of `date`'s month.
fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
