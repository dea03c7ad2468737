use std::collections::HashMap;

use crate::model::ids::TaskId;
use crate::model::task::Task;

/// An immutable, indexed view of the task forest at a point in time.
///
/// Built once per snapshot delivery: an id → index map plus a parent →
/// ordered-children map, so ancestor lookup is O(1) per hop and child lookup
/// is O(children) instead of a scan over the whole list. Sibling groups
/// (roots and each child list) are pre-sorted by the manual `order` key.
///
/// A dangling `parent_id` does not fail the build; the task is kept out of
/// the tree and surfaced through [`Snapshot::orphans`].
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    tasks: Vec<Task>,
    by_id: HashMap<TaskId, usize>,
    children: HashMap<TaskId, Vec<usize>>,
    roots: Vec<usize>,
    orphans: Vec<usize>,
}

impl Snapshot {
    pub fn new(tasks: Vec<Task>) -> Snapshot {
        // First occurrence wins for duplicate ids; the full list is kept so
        // validation can still see the duplicates.
        let mut by_id = HashMap::with_capacity(tasks.len());
        for (idx, task) in tasks.iter().enumerate() {
            by_id.entry(task.id.clone()).or_insert(idx);
        }

        let mut roots = Vec::new();
        let mut orphans = Vec::new();
        let mut children: HashMap<TaskId, Vec<usize>> = HashMap::new();
        for (idx, task) in tasks.iter().enumerate() {
            match &task.parent_id {
                None => roots.push(idx),
                // A task naming itself as parent would become its own child
                Some(parent) if parent == &task.id => orphans.push(idx),
                Some(parent) if by_id.contains_key(parent) => {
                    children.entry(parent.clone()).or_default().push(idx);
                }
                Some(_) => orphans.push(idx),
            }
        }

        let by_order = |a: &usize, b: &usize| tasks[*a].order.total_cmp(&tasks[*b].order);
        roots.sort_by(by_order);
        orphans.sort_by(by_order);
        for group in children.values_mut() {
            group.sort_by(by_order);
        }

        Snapshot {
            tasks,
            by_id,
            children,
            roots,
            orphans,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in snapshot (input) order, duplicates included.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.by_id.get(id).map(|idx| &self.tasks[*idx])
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Top-level tasks in manual order.
    pub fn roots(&self) -> Vec<&Task> {
        self.roots.iter().map(|idx| &self.tasks[*idx]).collect()
    }

    /// Direct children of a task in manual order.
    pub fn children(&self, id: &TaskId) -> Vec<&Task> {
        match self.children.get(id) {
            Some(group) => group.iter().map(|idx| &self.tasks[*idx]).collect(),
            None => Vec::new(),
        }
    }

    pub fn has_children(&self, id: &TaskId) -> bool {
        self.children.get(id).is_some_and(|group| !group.is_empty())
    }

    /// The parent task, or `None` for roots and dangling links.
    pub fn parent(&self, id: &TaskId) -> Option<&Task> {
        let task = self.get(id)?;
        let parent_id = task.parent_id.as_ref()?;
        if parent_id == id {
            return None;
        }
        self.get(parent_id)
    }

    /// The ancestor chain from the task's parent up to its root.
    ///
    /// The walk stops silently at a dangling parent link.
    pub fn ancestors(&self, id: &TaskId) -> Vec<&Task> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(task) = current {
            // Cap the walk; malformed input may contain parent cycles
            if chain.len() >= self.tasks.len() {
                break;
            }
            chain.push(task);
            current = self.parent(&task.id);
        }
        chain
    }

    /// Tasks whose `parent_id` references nothing in this snapshot, in
    /// manual order.
    pub fn orphans(&self) -> Vec<&Task> {
        self.orphans.iter().map(|idx| &self.tasks[*idx]).collect()
    }
}
