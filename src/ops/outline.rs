use std::collections::HashSet;

use serde::Serialize;

use crate::model::ids::TaskId;
use crate::model::snapshot::Snapshot;
use crate::model::task::Task;
use crate::ops::ordering::{SortMode, sort_tasks};

/// One renderable row of the outline view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineRow {
    pub id: TaskId,
    pub depth: usize,
    /// True when the task has visible children (an expand toggle is drawn)
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
    /// For tree continuation lines: whether each ancestor is the last sibling
    pub ancestor_last: Vec<bool>,
}

/// Flatten the visible forest into renderable rows based on expand state.
///
/// Rows descend only through expanded parents, and only into children that
/// are themselves visible. A visible subtask whose parent was filtered out
/// is not rendered here (it never appears disconnected inside the tree);
/// board lanes still show it. Sibling groups are ordered by `mode` without
/// touching stored orders.
pub fn outline_rows(
    snapshot: &Snapshot,
    visible: &[TaskId],
    expanded: &HashSet<TaskId>,
    mode: SortMode,
) -> Vec<OutlineRow> {
    let visible_set: HashSet<&TaskId> = visible.iter().collect();
    let mut roots: Vec<&Task> = snapshot
        .roots()
        .into_iter()
        .filter(|t| visible_set.contains(&t.id))
        .collect();
    sort_tasks(&mut roots, mode);

    let mut rows = Vec::new();
    flatten_rows(
        snapshot,
        &roots,
        &visible_set,
        expanded,
        mode,
        0,
        &[],
        &mut rows,
    );
    rows
}

fn flatten_rows(
    snapshot: &Snapshot,
    siblings: &[&Task],
    visible: &HashSet<&TaskId>,
    expanded: &HashSet<TaskId>,
    mode: SortMode,
    depth: usize,
    ancestor_last: &[bool],
    rows: &mut Vec<OutlineRow>,
) {
    let count = siblings.len();
    for (i, task) in siblings.iter().enumerate() {
        let is_last = i == count - 1;

        let mut children: Vec<&Task> = snapshot
            .children(&task.id)
            .into_iter()
            .filter(|c| visible.contains(&c.id))
            .collect();
        sort_tasks(&mut children, mode);

        let has_children = !children.is_empty();
        let is_expanded = has_children && expanded.contains(&task.id);

        rows.push(OutlineRow {
            id: task.id.clone(),
            depth,
            has_children,
            is_expanded,
            is_last_sibling: is_last,
            ancestor_last: ancestor_last.to_vec(),
        });

        if is_expanded {
            let mut new_ancestor_last = ancestor_last.to_vec();
            new_ancestor_last.push(is_last);
            flatten_rows(
                snapshot,
                &children,
                visible,
                expanded,
                mode,
                depth + 1,
                &new_ancestor_last,
                rows,
            );
        }
    }
}

/// Flip a task's expand state. Returns the new state.
pub fn toggle_expanded(expanded: &mut HashSet<TaskId>, id: &TaskId) -> bool {
    if expanded.remove(id) {
        false
    } else {
        expanded.insert(id.clone());
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, Status};

    fn task(id: &str, parent: Option<&str>, order: f64) -> Task {
        let mut t = Task::new(TaskId::new(id), format!("Task {}", id), Status::Todo, order);
        t.parent_id = parent.map(TaskId::new);
        t
    }

    fn forest() -> Snapshot {
        Snapshot::new(vec![
            task("b", None, 2.0),
            task("a", None, 1.0),
            task("a1", Some("a"), 1.0),
            task("a2", Some("a"), 2.0),
            task("a1x", Some("a1"), 1.0),
        ])
    }

    fn all_ids(snapshot: &Snapshot) -> Vec<TaskId> {
        snapshot.tasks().iter().map(|t| t.id.clone()).collect()
    }

    fn row_ids(rows: &[OutlineRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_collapsed_roots_render_one_row_each() {
        let snap = forest();
        let rows = outline_rows(&snap, &all_ids(&snap), &HashSet::new(), SortMode::Manual);
        assert_eq!(row_ids(&rows), vec!["a", "b"]);
        assert!(rows[0].has_children);
        assert!(!rows[0].is_expanded);
        assert!(!rows[1].has_children);
    }

    #[test]
    fn test_expanded_chain_nests_rows() {
        let snap = forest();
        let expanded: HashSet<TaskId> = [TaskId::new("a"), TaskId::new("a1")].into();
        let rows = outline_rows(&snap, &all_ids(&snap), &expanded, SortMode::Manual);
        assert_eq!(row_ids(&rows), vec!["a", "a1", "a1x", "a2", "b"]);

        let a1x = &rows[2];
        assert_eq!(a1x.depth, 2);
        assert!(a1x.is_last_sibling);
        // a is not the last root, a1 is not the last of a's children
        assert_eq!(a1x.ancestor_last, vec![false, false]);
    }

    #[test]
    fn test_filtered_children_clear_the_expand_marker() {
        let snap = forest();
        let visible = vec![TaskId::new("a"), TaskId::new("b")];
        let expanded: HashSet<TaskId> = [TaskId::new("a")].into();
        let rows = outline_rows(&snap, &visible, &expanded, SortMode::Manual);
        assert_eq!(row_ids(&rows), vec!["a", "b"]);
        assert!(!rows[0].has_children);
        assert!(!rows[0].is_expanded);
    }

    #[test]
    fn test_subtask_without_rendered_parent_stays_out() {
        let snap = forest();
        let visible = vec![TaskId::new("a1"), TaskId::new("b")];
        let rows = outline_rows(&snap, &visible, &HashSet::new(), SortMode::Manual);
        assert_eq!(row_ids(&rows), vec!["b"]);
    }

    #[test]
    fn test_sort_mode_reorders_each_sibling_group() {
        let snap = Snapshot::new(vec![
            {
                let mut t = task("low", None, 1.0);
                t.priority = Some(Priority::Low);
                t
            },
            {
                let mut t = task("urgent", None, 2.0);
                t.priority = Some(Priority::Urgent);
                t
            },
            {
                let mut t = task("child-med", Some("low"), 1.0);
                t.priority = Some(Priority::Medium);
                t
            },
            {
                let mut t = task("child-high", Some("low"), 2.0);
                t.priority = Some(Priority::High);
                t
            },
        ]);
        let expanded: HashSet<TaskId> = [TaskId::new("low")].into();

        let manual = outline_rows(&snap, &all_ids(&snap), &expanded, SortMode::Manual);
        assert_eq!(
            row_ids(&manual),
            vec!["low", "child-med", "child-high", "urgent"]
        );

        let by_priority = outline_rows(&snap, &all_ids(&snap), &expanded, SortMode::Priority);
        assert_eq!(
            row_ids(&by_priority),
            vec!["urgent", "low", "child-high", "child-med"]
        );
    }

    #[test]
    fn test_toggle_expanded_flips_membership() {
        let mut expanded = HashSet::new();
        let id = TaskId::new("a");
        assert!(toggle_expanded(&mut expanded, &id));
        assert!(expanded.contains(&id));
        assert!(!toggle_expanded(&mut expanded, &id));
        assert!(expanded.is_empty());
    }
}
