//! crates/academy_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific storage engines or social network APIs.

use crate::domain::{
    Course, Lesson, LessonCompletion, Platform, PublishReceipt, Quiz, QuizAttempt, SocialPost,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Storage failure: {0}")]
    StorageFailure(String),
    #[error("Remote service unreachable: {0}")]
    Unreachable(String),
    /// The remote side answered but refused the request.
    #[error("Rejected by remote service: {0}")]
    Rejected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait LearningStore: Send + Sync {
    // --- Catalog ---
    async fn get_course_by_slug(&self, slug: &str) -> PortResult<Course>;

    async fn get_lesson(&self, lesson_id: Uuid) -> PortResult<Lesson>;

    async fn get_quiz(&self, quiz_id: Uuid) -> PortResult<Quiz>;

    async fn get_quiz_for_course(&self, course_id: Uuid) -> PortResult<Option<Quiz>>;

    // --- Progress ---

    /// Inserts a completion unless one exists for `(user_id, lesson_id)`.
    /// Always returns the stored record, which keeps the first `completed_at`.
    async fn insert_completion_if_absent(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lesson_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> PortResult<LessonCompletion>;

    async fn get_completions(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> PortResult<Vec<LessonCompletion>>;

    // --- Quiz attempts ---
    async fn append_attempt(&self, attempt: QuizAttempt) -> PortResult<()>;

    async fn get_attempts(&self, user_id: Uuid, quiz_id: Uuid) -> PortResult<Vec<QuizAttempt>>;
}

#[async_trait]
pub trait SocialPublisher: Send + Sync {
    fn platform(&self) -> Platform;

    /// Publishes a post to this publisher's platform.
    async fn publish(&self, post: &SocialPost) -> PortResult<PublishReceipt>;
}
