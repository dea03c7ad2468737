use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{TaskId, UserId};
use crate::model::task::{Priority, Status};
use crate::ops::ordering::{ReorderPlan, ReorderScope};

/// One field-level edit captured by the autosave buffer.
///
/// Status and order changes travel as their own request kinds, not as field
/// edits, because they are produced by gestures rather than typed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    Title(String),
    Description(String),
    Priority(Option<Priority>),
    Assignee(Option<UserId>),
    StartDate(Option<DateTime<Utc>>),
    DueDate(Option<DateTime<Utc>>),
}

impl FieldEdit {
    /// Returns the key name for this edit's field. A later edit to the same
    /// key replaces the earlier one in the buffer.
    pub fn key(&self) -> &'static str {
        match self {
            FieldEdit::Title(_) => "title",
            FieldEdit::Description(_) => "description",
            FieldEdit::Priority(_) => "priority",
            FieldEdit::Assignee(_) => "assignee",
            FieldEdit::StartDate(_) => "start_date",
            FieldEdit::DueDate(_) => "due_date",
        }
    }
}

/// A write intent sent to the external persistence collaborator.
///
/// Requests are fire-and-forget: the caller pushes them into the outbox and
/// waits for a fresh snapshot, not a return value. The collaborator is the
/// source of truth once a request is acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationRequest {
    StatusChange {
        task: TaskId,
        status: Status,
    },
    Reorder {
        task: TaskId,
        /// Carried so the collaborator can re-validate against its own state
        target: TaskId,
        scope: ReorderScope,
        new_order: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_status: Option<Status>,
        /// Scope-wide reassignments when midpoint precision ran out
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        renumber: Vec<(TaskId, f64)>,
    },
    ColumnMigration {
        status_key: Status,
        fallback: Status,
        tasks: Vec<TaskId>,
    },
    FieldUpdate {
        task: TaskId,
        edits: Vec<FieldEdit>,
    },
}

impl From<ReorderPlan> for MutationRequest {
    fn from(plan: ReorderPlan) -> Self {
        MutationRequest::Reorder {
            task: plan.task,
            target: plan.target,
            scope: plan.scope,
            new_order: plan.new_order,
            new_status: plan.new_status,
            renumber: plan.renumber,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_edit_keys() {
        assert_eq!(FieldEdit::Title("x".to_string()).key(), "title");
        assert_eq!(FieldEdit::Priority(Some(Priority::High)).key(), "priority");
        assert_eq!(FieldEdit::DueDate(None).key(), "due_date");
    }

    #[test]
    fn test_reorder_request_omits_empty_fields() {
        let request = MutationRequest::Reorder {
            task: TaskId::new("a"),
            target: TaskId::new("b"),
            scope: ReorderScope::Any,
            new_order: 1536.0,
            new_status: None,
            renumber: Vec::new(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"reorder","task":"a","target":"b","scope":"any","new_order":1536.0}"#
        );
        let back: MutationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_status_change_wire_shape() {
        let request = MutationRequest::StatusChange {
            task: TaskId::new("a"),
            status: Status::Custom("qa".to_string()),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"kind":"status_change","task":"a","status":"qa"}"#);
    }
}
