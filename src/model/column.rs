use serde::{Deserialize, Serialize};

use crate::model::task::Status;

/// A board column definition.
///
/// Built-in columns exist even with zero records; a custom record for a
/// built-in key overrides its display metadata in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// The status key whose tasks land in this column
    pub status_key: Status,
    /// Display name
    pub name: String,
    /// Header color as a hex string
    #[serde(default = "default_color")]
    pub color: String,
    /// Position among columns, ascending
    #[serde(default)]
    pub position: i64,
    /// Whether this key is one of the five built-in statuses
    #[serde(default)]
    pub built_in: bool,
}

impl Column {
    /// Create a custom column for the given key.
    pub fn new(status_key: Status, name: impl Into<String>, position: i64) -> Self {
        let built_in = status_key.is_built_in();
        Column {
            status_key,
            name: name.into(),
            color: default_color(),
            position,
            built_in,
        }
    }

    /// The default column for a built-in status, or `None` for custom keys.
    pub fn built_in_default(status: &Status) -> Option<Column> {
        let (name, color, position) = match status {
            Status::Todo => ("To Do", "#94a3b8", 0),
            Status::InProgress => ("In Progress", "#3b82f6", 1),
            Status::Review => ("Review", "#f59e0b", 2),
            Status::Done => ("Done", "#22c55e", 3),
            Status::Blocked => ("Blocked", "#ef4444", 4),
            Status::Custom(_) => return None,
        };
        Some(Column {
            status_key: status.clone(),
            name: name.to_string(),
            color: color.to_string(),
            position,
            built_in: true,
        })
    }
}

fn default_color() -> String {
    "#94a3b8".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_defaults_cover_all_five() {
        for status in Status::built_in() {
            let col = Column::built_in_default(&status).unwrap();
            assert_eq!(col.status_key, status);
            assert!(col.built_in);
        }
        assert!(Column::built_in_default(&Status::Custom("qa".into())).is_none());
    }

    #[test]
    fn test_column_deserializes_with_defaults() {
        let col: Column =
            serde_json::from_str(r#"{"status_key": "qa", "name": "QA"}"#).unwrap();
        assert_eq!(col.status_key, Status::Custom("qa".to_string()));
        assert_eq!(col.position, 0);
        assert!(!col.built_in);
        assert_eq!(col.color, "#94a3b8");
    }
}
