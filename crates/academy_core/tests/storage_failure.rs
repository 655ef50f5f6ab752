//! Store failures surface as `CourseError::StorageFailure` and leave nothing behind.

use academy_core::{
    completed_lesson_ids, course_status, issue_certificate, mark_lesson_complete, submit_attempt,
    Answers, Course, CourseError, Lesson, LearningStore, LessonCompletion, PortError, PortResult,
    Question, Quiz, QuizAttempt, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

const DISK_FULL: &str = "disk full";

/// Serves a fixed catalog, but every progress or attempt call fails.
struct FailingStore {
    course: Course,
    quiz: Quiz,
}

impl FailingStore {
    fn new() -> Self {
        let course_id = Uuid::new_v4();
        Self {
            course: Course {
                id: course_id,
                slug: "neyron-tarmoqlar".to_string(),
                title: "Neyron tarmoqlar".to_string(),
                lessons: vec![Lesson {
                    id: Uuid::new_v4(),
                    course_id,
                    title: "1-dars".to_string(),
                    position: 1,
                }],
            },
            quiz: Quiz {
                id: Uuid::new_v4(),
                course_id,
                passing_score_percent: 50,
                questions: vec![Question {
                    text: "Perseptron nima?".to_string(),
                    options: vec!["Neyron modeli".into(), "Protokol".into()],
                    correct_option_index: 0,
                    explanation: None,
                }],
            },
        }
    }

    fn lesson_id(&self) -> Uuid {
        self.course.lessons[0].id
    }
}

fn disk_full<T>() -> PortResult<T> {
    Err(PortError::StorageFailure(DISK_FULL.to_string()))
}

#[async_trait]
impl LearningStore for FailingStore {
    async fn get_course_by_slug(&self, _slug: &str) -> PortResult<Course> {
        Ok(self.course.clone())
    }

    async fn get_lesson(&self, lesson_id: Uuid) -> PortResult<Lesson> {
        self.course
            .lessons
            .iter()
            .find(|l| l.id == lesson_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Lesson {} not found", lesson_id)))
    }

    async fn get_quiz(&self, _quiz_id: Uuid) -> PortResult<Quiz> {
        Ok(self.quiz.clone())
    }

    async fn get_quiz_for_course(&self, _course_id: Uuid) -> PortResult<Option<Quiz>> {
        Ok(Some(self.quiz.clone()))
    }

    async fn insert_completion_if_absent(
        &self,
        _user_id: Uuid,
        _course_id: Uuid,
        _lesson_id: Uuid,
        _completed_at: DateTime<Utc>,
    ) -> PortResult<LessonCompletion> {
        disk_full()
    }

    async fn get_completions(
        &self,
        _user_id: Uuid,
        _course_id: Uuid,
    ) -> PortResult<Vec<LessonCompletion>> {
        disk_full()
    }

    async fn append_attempt(&self, _attempt: QuizAttempt) -> PortResult<()> {
        disk_full()
    }

    async fn get_attempts(&self, _user_id: Uuid, _quiz_id: Uuid) -> PortResult<Vec<QuizAttempt>> {
        disk_full()
    }
}

fn assert_storage_failure<T: std::fmt::Debug>(result: Result<T, CourseError>) {
    match result {
        Err(CourseError::StorageFailure(msg)) => assert_eq!(msg, DISK_FULL),
        other => panic!("expected StorageFailure, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_completion_write_is_reported() {
    let store = FailingStore::new();
    let result = mark_lesson_complete(&store, Uuid::new_v4(), store.lesson_id()).await;
    assert_storage_failure(result);
}

#[tokio::test]
async fn failed_ledger_read_is_reported() {
    let store = FailingStore::new();
    let result = completed_lesson_ids(&store, Uuid::new_v4(), store.course.id).await;
    assert_storage_failure(result);
}

#[tokio::test]
async fn failed_attempt_write_is_reported() {
    let store = FailingStore::new();
    let answers: Answers = [(0, 0)].into_iter().collect();
    let result = submit_attempt(&store, Uuid::new_v4(), store.quiz.id, answers).await;
    assert_storage_failure(result);
}

#[tokio::test]
async fn progress_and_certificate_fail_rather_than_report_incomplete() {
    let store = FailingStore::new();
    let user = User {
        id: Uuid::new_v4(),
        display_name: "Dilnoza Karimova".to_string(),
    };

    assert_storage_failure(course_status(&store, user.id, &store.course).await);
    // Must not degrade to NotEligible.
    assert_storage_failure(issue_certificate(&store, &user, &store.course).await);
}

#[tokio::test]
async fn unknown_lesson_is_still_not_found() {
    let store = FailingStore::new();
    let result = mark_lesson_complete(&store, Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(matches!(result, Err(CourseError::NotFound(_))));
}
