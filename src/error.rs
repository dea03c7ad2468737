use crate::model::ids::TaskId;

/// Error type for engine operations.
///
/// Every fallible boundary of the engine reports one of these four kinds;
/// internal walks (ancestor lookup, filter evaluation) degrade to "no match"
/// instead of erroring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("task {task} references missing parent {parent}")]
    OrphanedParent { task: TaskId, parent: TaskId },
    #[error("stale task reference: {0}")]
    StaleReference(TaskId),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("mutation rejected: {0}")]
    MutationRejected(String),
}

impl EngineError {
    /// Returns the stable kind key for this error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::OrphanedParent { .. } => "orphaned_parent",
            EngineError::StaleReference(_) => "stale_reference",
            EngineError::InvalidArgument(_) => "invalid_argument",
            EngineError::MutationRejected(_) => "mutation_rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = EngineError::StaleReference(TaskId::new("t-42"));
        assert_eq!(err.to_string(), "stale task reference: t-42");
        assert_eq!(err.kind(), "stale_reference");

        let err = EngineError::OrphanedParent {
            task: TaskId::new("t-1"),
            parent: TaskId::new("gone"),
        };
        assert_eq!(err.to_string(), "task t-1 references missing parent gone");
        assert_eq!(err.kind(), "orphaned_parent");
    }
}
