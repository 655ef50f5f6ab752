//! crates/academy_core/src/memory.rs
//!
//! An in-process `LearningStore`. Used by the test suites and for running the
//! service without a database.

use crate::domain::{Course, Lesson, LessonCompletion, Quiz, QuizAttempt, QuizDefinitionError};
use crate::ports::{LearningStore, PortError, PortResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    courses: HashMap<Uuid, Course>,
    quizzes: HashMap<Uuid, Quiz>,
    completions: HashMap<(Uuid, Uuid), LessonCompletion>,
    attempts: Vec<QuizAttempt>,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_course(&self, mut course: Course) {
        course.lessons.sort_by_key(|l| l.position);
        self.inner.lock().await.courses.insert(course.id, course);
    }

    /// Registers a quiz, refusing definitions that break the question invariants
    /// and a second quiz for a course that already has one.
    pub async fn add_quiz(&self, quiz: Quiz) -> Result<(), QuizDefinitionError> {
        quiz.validate()?;
        let mut inner = self.inner.lock().await;
        if inner
            .quizzes
            .values()
            .any(|q| q.course_id == quiz.course_id && q.id != quiz.id)
        {
            return Err(QuizDefinitionError::CourseAlreadyHasQuiz(quiz.course_id));
        }
        inner.quizzes.insert(quiz.id, quiz);
        Ok(())
    }

    /// Number of completion rows held for a user, across all courses.
    pub async fn completion_count(&self, user_id: Uuid) -> usize {
        self.inner
            .lock()
            .await
            .completions
            .keys()
            .filter(|(uid, _)| *uid == user_id)
            .count()
    }
}

#[async_trait]
impl LearningStore for InMemoryStore {
    async fn get_course_by_slug(&self, slug: &str) -> PortResult<Course> {
        self.inner
            .lock()
            .await
            .courses
            .values()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Course '{}' not found", slug)))
    }

    async fn get_lesson(&self, lesson_id: Uuid) -> PortResult<Lesson> {
        self.inner
            .lock()
            .await
            .courses
            .values()
            .flat_map(|c| c.lessons.iter())
            .find(|l| l.id == lesson_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Lesson {} not found", lesson_id)))
    }

    async fn get_quiz(&self, quiz_id: Uuid) -> PortResult<Quiz> {
        self.inner
            .lock()
            .await
            .quizzes
            .get(&quiz_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Quiz {} not found", quiz_id)))
    }

    async fn get_quiz_for_course(&self, course_id: Uuid) -> PortResult<Option<Quiz>> {
        Ok(self
            .inner
            .lock()
            .await
            .quizzes
            .values()
            .find(|q| q.course_id == course_id)
            .cloned())
    }

    async fn insert_completion_if_absent(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lesson_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> PortResult<LessonCompletion> {
        // Check and insert happen under one lock, so the first writer wins.
        let mut inner = self.inner.lock().await;
        let record = inner
            .completions
            .entry((user_id, lesson_id))
            .or_insert_with(|| LessonCompletion {
                user_id,
                course_id,
                lesson_id,
                completed_at,
            });
        Ok(record.clone())
    }

    async fn get_completions(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> PortResult<Vec<LessonCompletion>> {
        let inner = self.inner.lock().await;
        let mut completions: Vec<LessonCompletion> = inner
            .completions
            .values()
            .filter(|c| c.user_id == user_id && c.course_id == course_id)
            .cloned()
            .collect();
        completions.sort_by_key(|c| c.completed_at);
        Ok(completions)
    }

    async fn append_attempt(&self, attempt: QuizAttempt) -> PortResult<()> {
        self.inner.lock().await.attempts.push(attempt);
        Ok(())
    }

    async fn get_attempts(&self, user_id: Uuid, quiz_id: Uuid) -> PortResult<Vec<QuizAttempt>> {
        Ok(self
            .inner
            .lock()
            .await
            .attempts
            .iter()
            .filter(|a| a.user_id == user_id && a.quiz_id == quiz_id)
            .cloned()
            .collect())
    }
}
