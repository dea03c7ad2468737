use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{TaskId, UserId};

/// Workflow status of a task, doubling as its board-column key.
///
/// The five built-in keys always exist; `Custom` carries the key of a
/// user-defined column. Unknown keys are preserved as `Custom` rather than
/// rejected, since custom columns introduce exactly such keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Todo,
    InProgress,
    Review,
    Done,
    Blocked,
    /// Key of a user-defined column
    Custom(String),
}

impl Status {
    /// The wire key for this status (`todo`, `in_progress`, ...)
    pub fn as_key(&self) -> &str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Review => "review",
            Status::Done => "done",
            Status::Blocked => "blocked",
            Status::Custom(key) => key,
        }
    }

    /// Parse a wire key into a status. Unknown keys become `Custom`.
    pub fn from_key(key: &str) -> Status {
        match key {
            "todo" => Status::Todo,
            "in_progress" => Status::InProgress,
            "review" => Status::Review,
            "done" => Status::Done,
            "blocked" => Status::Blocked,
            other => Status::Custom(other.to_string()),
        }
    }

    /// The five built-in statuses in default board order.
    pub fn built_in() -> [Status; 5] {
        [
            Status::Todo,
            Status::InProgress,
            Status::Review,
            Status::Done,
            Status::Blocked,
        ]
    }

    pub fn is_built_in(&self) -> bool {
        !matches!(self, Status::Custom(_))
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

// Statuses travel as bare key strings, so serde bridges through the key
// parsing instead of a derive (a derive cannot collapse `Custom` this way).
impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_key())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        Ok(Status::from_key(&key))
    }
}

/// Task priority. Variant order is urgency order, so sorting ascending puts
/// `Urgent` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// The wire key for this priority
    pub fn as_key(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse a wire key into a priority. Unrecognized keys map to `None`,
    /// which sorts after every recognized priority.
    pub fn from_key(key: &str) -> Option<Priority> {
        match key {
            "urgent" => Some(Priority::Urgent),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// A task record as supplied by the host application.
///
/// The engine never constructs tasks on its own; records arrive in snapshots
/// and every mutation goes back out as a request. Tag membership is not
/// embedded here; it lives in the external [`TagIndex`](crate::model::tags::TagIndex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier
    pub id: TaskId,
    /// Parent task, if this is a subtask
    #[serde(default)]
    pub parent_id: Option<TaskId>,
    /// Title text (the search target)
    pub title: String,
    /// Longer free-form description
    #[serde(default)]
    pub description: String,
    /// Workflow status / board column key
    pub status: Status,
    /// Priority, if set
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Assigned user, if any
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    /// Scheduled start instant
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Scheduled due instant
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Manual ordering key; unique within its comparison scope
    pub order: f64,
}

impl Task {
    /// Create a task with the required fields; optional fields start unset.
    pub fn new(id: TaskId, title: impl Into<String>, status: Status, order: f64) -> Self {
        Task {
            id,
            parent_id: None,
            title: title.into(),
            description: String::new(),
            status,
            priority: None,
            assignee_id: None,
            start_date: None,
            due_date: None,
            order,
        }
    }

    /// Whether this task qualifies for a timeline bar: both dates present
    /// and the due date not before the start date.
    pub fn is_scheduled(&self) -> bool {
        match (self.start_date, self.due_date) {
            (Some(start), Some(due)) => due.date_naive() >= start.date_naive(),
            _ => false,
        }
    }
}
