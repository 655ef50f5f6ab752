//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `LearningStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use academy_core::domain::{Answers, Course, Lesson, LessonCompletion, Question, Quiz, QuizAttempt};
use academy_core::ports::{LearningStore, PortError, PortResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `LearningStore` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    async fn lessons_for(&self, course_id: Uuid) -> PortResult<Vec<Lesson>> {
        let records = sqlx::query_as::<_, LessonRecord>(
            "SELECT id, course_id, title, position FROM lessons WHERE course_id = $1 ORDER BY position ASC",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn with_lessons(&self, record: CourseRecord) -> PortResult<Course> {
        let lessons = self.lessons_for(record.id).await?;
        Ok(Course {
            id: record.id,
            slug: record.slug,
            title: record.title,
            lessons,
        })
    }
}

fn storage(e: sqlx::Error) -> PortError {
    PortError::StorageFailure(e.to_string())
}

fn not_found_or_storage(e: sqlx::Error, what: String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        _ => storage(e),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct CourseRecord {
    id: Uuid,
    slug: String,
    title: String,
}

#[derive(FromRow)]
struct LessonRecord {
    id: Uuid,
    course_id: Uuid,
    title: String,
    position: i32,
}
impl LessonRecord {
    fn to_domain(self) -> Lesson {
        Lesson {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            position: self.position,
        }
    }
}

/// One element of the `quizzes.questions` JSONB array.
#[derive(Serialize, Deserialize)]
struct QuestionRecord {
    text: String,
    options: Vec<String>,
    correct_option_index: usize,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(FromRow)]
struct QuizRecord {
    id: Uuid,
    course_id: Uuid,
    passing_score_percent: i16,
    questions: Json<Vec<QuestionRecord>>,
}
impl QuizRecord {
    fn to_domain(self) -> PortResult<Quiz> {
        let passing_score_percent = u8::try_from(self.passing_score_percent).map_err(|_| {
            PortError::StorageFailure(format!(
                "Quiz {} has passing score {} out of range",
                self.id, self.passing_score_percent
            ))
        })?;
        let quiz = Quiz {
            id: self.id,
            course_id: self.course_id,
            passing_score_percent,
            questions: self
                .questions
                .0
                .into_iter()
                .map(|q| Question {
                    text: q.text,
                    options: q.options,
                    correct_option_index: q.correct_option_index,
                    explanation: q.explanation,
                })
                .collect(),
        };
        quiz.validate().map_err(|e| {
            PortError::StorageFailure(format!("Quiz {} is malformed: {}", quiz.id, e))
        })?;
        Ok(quiz)
    }
}

#[derive(FromRow)]
struct CompletionRecord {
    user_id: Uuid,
    course_id: Uuid,
    lesson_id: Uuid,
    completed_at: DateTime<Utc>,
}
impl CompletionRecord {
    fn to_domain(self) -> LessonCompletion {
        LessonCompletion {
            user_id: self.user_id,
            course_id: self.course_id,
            lesson_id: self.lesson_id,
            completed_at: self.completed_at,
        }
    }
}

#[derive(FromRow)]
struct AttemptRecord {
    id: Uuid,
    user_id: Uuid,
    quiz_id: Uuid,
    answers: Json<Answers>,
    score_percent: i16,
    passed: bool,
    submitted_at: DateTime<Utc>,
}
impl AttemptRecord {
    fn to_domain(self) -> QuizAttempt {
        QuizAttempt {
            id: self.id,
            user_id: self.user_id,
            quiz_id: self.quiz_id,
            answers: self.answers.0,
            score_percent: self.score_percent.clamp(0, 100) as u8,
            passed: self.passed,
            submitted_at: self.submitted_at,
        }
    }
}

//=========================================================================================
// `LearningStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl LearningStore for PgStore {
    async fn get_course_by_slug(&self, slug: &str) -> PortResult<Course> {
        let record = sqlx::query_as::<_, CourseRecord>(
            "SELECT id, slug, title FROM courses WHERE slug = $1",
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_storage(e, format!("Course '{}' not found", slug)))?;
        self.with_lessons(record).await
    }

    async fn get_lesson(&self, lesson_id: Uuid) -> PortResult<Lesson> {
        let record = sqlx::query_as::<_, LessonRecord>(
            "SELECT id, course_id, title, position FROM lessons WHERE id = $1",
        )
        .bind(lesson_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_storage(e, format!("Lesson {} not found", lesson_id)))?;
        Ok(record.to_domain())
    }

    async fn get_quiz(&self, quiz_id: Uuid) -> PortResult<Quiz> {
        let record = sqlx::query_as::<_, QuizRecord>(
            "SELECT id, course_id, passing_score_percent, questions FROM quizzes WHERE id = $1",
        )
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_storage(e, format!("Quiz {} not found", quiz_id)))?;
        record.to_domain()
    }

    async fn get_quiz_for_course(&self, course_id: Uuid) -> PortResult<Option<Quiz>> {
        let record = sqlx::query_as::<_, QuizRecord>(
            "SELECT id, course_id, passing_score_percent, questions FROM quizzes WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;
        record.map(QuizRecord::to_domain).transpose()
    }

    async fn insert_completion_if_absent(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lesson_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> PortResult<LessonCompletion> {
        // The primary key on (user_id, lesson_id) arbitrates concurrent inserts.
        sqlx::query(
            "INSERT INTO lesson_completions (user_id, course_id, lesson_id, completed_at) VALUES ($1, $2, $3, $4) ON CONFLICT (user_id, lesson_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(lesson_id)
        .bind(completed_at)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        let record = sqlx::query_as::<_, CompletionRecord>(
            "SELECT user_id, course_id, lesson_id, completed_at FROM lesson_completions WHERE user_id = $1 AND lesson_id = $2",
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;
        Ok(record.to_domain())
    }

    async fn get_completions(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> PortResult<Vec<LessonCompletion>> {
        let records = sqlx::query_as::<_, CompletionRecord>(
            "SELECT user_id, course_id, lesson_id, completed_at FROM lesson_completions WHERE user_id = $1 AND course_id = $2 ORDER BY completed_at ASC",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn append_attempt(&self, attempt: QuizAttempt) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO quiz_attempts (id, user_id, quiz_id, answers, score_percent, passed, submitted_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(attempt.id)
        .bind(attempt.user_id)
        .bind(attempt.quiz_id)
        .bind(Json(&attempt.answers))
        .bind(i16::from(attempt.score_percent))
        .bind(attempt.passed)
        .bind(attempt.submitted_at)
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        Ok(())
    }

    async fn get_attempts(&self, user_id: Uuid, quiz_id: Uuid) -> PortResult<Vec<QuizAttempt>> {
        let records = sqlx::query_as::<_, AttemptRecord>(
            "SELECT id, user_id, quiz_id, answers, score_percent, passed, submitted_at FROM quiz_attempts WHERE user_id = $1 AND quiz_id = $2 ORDER BY submitted_at ASC",
        )
        .bind(user_id)
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
