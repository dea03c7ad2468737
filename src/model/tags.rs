use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::ids::{TagId, TaskId};

/// Task → tag association.
///
/// Tags are owned by an external collaborator; the host passes this index
/// alongside each snapshot and the filter queries it. Tasks never embed
/// their tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagIndex {
    by_task: HashMap<TaskId, HashSet<TagId>>,
}

impl TagIndex {
    pub fn new() -> Self {
        TagIndex::default()
    }

    /// Build an index from (task, tag) pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (TaskId, TagId)>,
    {
        let mut index = TagIndex::new();
        for (task, tag) in pairs {
            index.insert(task, tag);
        }
        index
    }

    /// Associate a tag with a task. Adding the same pair twice is a no-op.
    pub fn insert(&mut self, task: TaskId, tag: TagId) {
        self.by_task.entry(task).or_default().insert(tag);
    }

    pub fn remove(&mut self, task: &TaskId, tag: &TagId) {
        if let Some(tags) = self.by_task.get_mut(task) {
            tags.remove(tag);
            if tags.is_empty() {
                self.by_task.remove(task);
            }
        }
    }

    pub fn has_tag(&self, task: &TaskId, tag: &TagId) -> bool {
        self.by_task
            .get(task)
            .is_some_and(|tags| tags.contains(tag))
    }

    /// Tags on the given task, if any.
    pub fn tags_for(&self, task: &TaskId) -> Option<&HashSet<TagId>> {
        self.by_task.get(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_query() {
        let mut index = TagIndex::new();
        index.insert(TaskId::new("t-1"), TagId::new("bug"));
        index.insert(TaskId::new("t-1"), TagId::new("bug"));
        index.insert(TaskId::new("t-1"), TagId::new("urgent"));

        assert!(index.has_tag(&TaskId::new("t-1"), &TagId::new("bug")));
        assert!(!index.has_tag(&TaskId::new("t-2"), &TagId::new("bug")));
        assert_eq!(index.tags_for(&TaskId::new("t-1")).unwrap().len(), 2);
    }

    #[test]
    fn test_remove_drops_empty_entries() {
        let mut index = TagIndex::from_pairs([(TaskId::new("t-1"), TagId::new("bug"))]);
        index.remove(&TaskId::new("t-1"), &TagId::new("bug"));
        assert_eq!(index.tags_for(&TaskId::new("t-1")), None);
    }
}
