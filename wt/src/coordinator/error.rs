//! Coordinator error types

use thiserror::Error;

use crate::report::ReportError;
use crate::source::SourceError;
use crate::table::TableError;

/// Errors that end a run; all map to a non-zero exit status
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Task {task} failed: {reason}")]
    TaskFailed { task: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_failed_message() {
        let err = CoordinatorError::TaskFailed {
            task: "reader /tmp/pipe".to_string(),
            reason: "panicked".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("/tmp/pipe"));
        assert!(msg.contains("panicked"));
    }

    #[test]
    fn test_source_error_is_transparent() {
        let err: CoordinatorError = SourceError::TooManySources { given: 12, max: 9 }.into();
        assert_eq!(err.to_string(), "Too many sources: 12 given, at most 9 allowed besides stdin");
    }
}
