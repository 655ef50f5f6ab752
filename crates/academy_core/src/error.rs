//! crates/academy_core/src/error.rs
//!
//! The error type returned by the core's course operations.

use crate::domain::QuizDefinitionError;
use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    /// Certificate requested before the completion criteria are met.
    #[error("Course requirements are not yet satisfied")]
    NotEligible,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid quiz definition: {0}")]
    InvalidQuiz(#[from] QuizDefinitionError),

    /// Any persistence error, propagated unchanged.
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl From<PortError> for CourseError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => CourseError::NotFound(what),
            PortError::StorageFailure(msg)
            | PortError::Unreachable(msg)
            | PortError::Rejected(msg) => {
                CourseError::StorageFailure(msg)
            }
        }
    }
}

pub type CourseResult<T> = Result<T, CourseError>;
