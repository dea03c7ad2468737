use regex::Regex;

use crate::model::ids::{TagId, TaskId, UserId};
use crate::model::snapshot::Snapshot;
use crate::model::tags::TagIndex;
use crate::model::task::{Priority, Status, Task};

/// The predicate set applied to a snapshot. Unset fields are vacuously true.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    /// Case-insensitive substring match against titles
    pub search: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assignee: Option<UserId>,
    /// AND semantics: every listed tag must be satisfied
    pub tags: Vec<TagId>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().is_none_or(str::is_empty)
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.tags.is_empty()
    }
}

/// Produce the ids of tasks that remain visible, in snapshot order.
///
/// Inclusion is decided per task; each predicate propagates through the tree
/// in its own direction:
/// - search: own title, or any ancestor's title (a subtask surfaces with the
///   root it was located under; hierarchical views still only render it
///   beneath a rendered parent)
/// - status / priority / assignee: own value, or any direct child's value
///   (one level, so a parent stays visible while work is ongoing below it)
/// - tags: every selected tag present on the task itself or somewhere on its
///   ancestor chain, each tag independently
pub fn filter_tasks(snapshot: &Snapshot, tags: &TagIndex, filter: &TaskFilter) -> Vec<TaskId> {
    let search_re = filter
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(search_regex);

    snapshot
        .tasks()
        .iter()
        .filter(|task| passes(snapshot, tags, filter, search_re.as_ref(), task))
        .map(|task| task.id.clone())
        .collect()
}

/// Compile a search string into a case-insensitive substring matcher.
pub fn search_regex(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", regex::escape(pattern))).ok()
}

fn passes(
    snapshot: &Snapshot,
    tags: &TagIndex,
    filter: &TaskFilter,
    search_re: Option<&Regex>,
    task: &Task,
) -> bool {
    if let Some(re) = search_re {
        if !matches_search(snapshot, re, task) {
            return false;
        }
    }
    if let Some(status) = &filter.status {
        if !matches_status(snapshot, task, status) {
            return false;
        }
    }
    if let Some(priority) = filter.priority {
        if !matches_priority(snapshot, task, priority) {
            return false;
        }
    }
    if let Some(assignee) = &filter.assignee {
        if !matches_assignee(snapshot, task, assignee) {
            return false;
        }
    }
    if !filter.tags.is_empty() && !matches_tags(snapshot, tags, task, &filter.tags) {
        return false;
    }
    true
}

fn matches_search(snapshot: &Snapshot, re: &Regex, task: &Task) -> bool {
    if re.is_match(&task.title) {
        return true;
    }
    // Roots have no chain, so this reduces to the own-title rule for them
    snapshot
        .ancestors(&task.id)
        .iter()
        .any(|ancestor| re.is_match(&ancestor.title))
}

fn matches_status(snapshot: &Snapshot, task: &Task, wanted: &Status) -> bool {
    if task.status == *wanted {
        return true;
    }
    snapshot
        .children(&task.id)
        .iter()
        .any(|child| child.status == *wanted)
}

fn matches_priority(snapshot: &Snapshot, task: &Task, wanted: Priority) -> bool {
    if task.priority == Some(wanted) {
        return true;
    }
    snapshot
        .children(&task.id)
        .iter()
        .any(|child| child.priority == Some(wanted))
}

fn matches_assignee(snapshot: &Snapshot, task: &Task, wanted: &UserId) -> bool {
    if task.assignee_id.as_ref() == Some(wanted) {
        return true;
    }
    snapshot
        .children(&task.id)
        .iter()
        .any(|child| child.assignee_id.as_ref() == Some(wanted))
}

/// Each tag may be satisfied at a different level of the chain.
fn matches_tags(snapshot: &Snapshot, index: &TagIndex, task: &Task, wanted: &[TagId]) -> bool {
    let chain = snapshot.ancestors(&task.id);
    wanted.iter().all(|tag| {
        index.has_tag(&task.id, tag) || chain.iter().any(|ancestor| index.has_tag(&ancestor.id, tag))
    })
}
