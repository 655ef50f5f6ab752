//! crates/academy_core/src/progress.rs
//!
//! The progress ledger: which lessons a user has finished.

use crate::domain::LessonCompletion;
use crate::error::CourseResult;
use crate::ports::LearningStore;
use chrono::Utc;
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

/// Records that `user_id` finished `lesson_id`.
///
/// Idempotent: a second call returns the record created by the first one,
/// original `completed_at` included. Uniqueness is the store's job.
pub async fn mark_lesson_complete(
    store: &dyn LearningStore,
    user_id: Uuid,
    lesson_id: Uuid,
) -> CourseResult<LessonCompletion> {
    let lesson = store.get_lesson(lesson_id).await?;
    let completion = store
        .insert_completion_if_absent(user_id, lesson.course_id, lesson.id, Utc::now())
        .await?;
    info!(
        "Lesson {} of course {} completed by user {} at {}",
        lesson.id, lesson.course_id, user_id, completion.completed_at
    );
    Ok(completion)
}

/// The ids of the lessons `user_id` has completed within `course_id`.
pub async fn completed_lesson_ids(
    store: &dyn LearningStore,
    user_id: Uuid,
    course_id: Uuid,
) -> CourseResult<HashSet<Uuid>> {
    let completions = store.get_completions(user_id, course_id).await?;
    Ok(completions.into_iter().map(|c| c.lesson_id).collect())
}
