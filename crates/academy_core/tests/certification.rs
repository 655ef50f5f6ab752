//! End-to-end course flows against the in-memory store.

use academy_core::memory::InMemoryStore;
use academy_core::{
    is_course_complete_for, issue_certificate, mark_lesson_complete, submit_attempt,
    verification_id, Answers, Course, CourseError, Lesson, Question, Quiz, User,
};
use std::time::Duration;
use uuid::Uuid;

fn course(lessons: i32) -> Course {
    let id = Uuid::new_v4();
    Course {
        id,
        slug: format!("kurs-{}", id.simple()),
        title: "Prompt muhandisligi".to_string(),
        lessons: (1..=lessons)
            .map(|position| Lesson {
                id: Uuid::new_v4(),
                course_id: id,
                title: format!("{}-dars", position),
                position,
            })
            .collect(),
    }
}

fn student() -> User {
    User {
        id: Uuid::new_v4(),
        display_name: "Dilnoza Karimova".to_string(),
    }
}

#[tokio::test]
async fn three_lessons_without_quiz_unlock_certificate_after_last_lesson() {
    let store = InMemoryStore::new();
    let course = course(3);
    store.add_course(course.clone()).await;
    let user = student();

    for lesson in &course.lessons[..2] {
        mark_lesson_complete(&store, user.id, lesson.id).await.unwrap();
    }
    assert!(!is_course_complete_for(&store, user.id, &course).await.unwrap());
    assert!(matches!(
        issue_certificate(&store, &user, &course).await,
        Err(CourseError::NotEligible)
    ));

    tokio::time::sleep(Duration::from_millis(5)).await;
    let last = mark_lesson_complete(&store, user.id, course.lessons[2].id)
        .await
        .unwrap();
    assert!(is_course_complete_for(&store, user.id, &course).await.unwrap());

    let certificate = issue_certificate(&store, &user, &course).await.unwrap();
    assert_eq!(certificate.completion_date, last.completed_at);
    assert_eq!(certificate.user_name, "Dilnoza Karimova");
    assert_eq!(certificate.course_title, "Prompt muhandisligi");
    assert_eq!(certificate.verification_id, verification_id(user.id));

    // Viewing again yields the same certificate.
    let again = issue_certificate(&store, &user, &course).await.unwrap();
    assert_eq!(again, certificate);
}

#[tokio::test]
async fn failed_quiz_blocks_until_a_passing_attempt() {
    let store = InMemoryStore::new();
    let course = course(2);
    store.add_course(course.clone()).await;
    let quiz = Quiz {
        id: Uuid::new_v4(),
        course_id: course.id,
        passing_score_percent: 50,
        questions: vec![
            Question {
                text: "LLM nima?".to_string(),
                options: vec!["Til modeli".into(), "Ma'lumotlar bazasi".into()],
                correct_option_index: 0,
                explanation: Some("Katta til modeli".to_string()),
            },
            Question {
                text: "Prompt nima?".to_string(),
                options: vec!["Rasm".into(), "Ko'rsatma".into(), "Fayl".into()],
                correct_option_index: 1,
                explanation: None,
            },
        ],
    };
    store.add_quiz(quiz.clone()).await.unwrap();
    let user = student();

    for lesson in &course.lessons {
        mark_lesson_complete(&store, user.id, lesson.id).await.unwrap();
    }

    let failed = submit_attempt(&store, user.id, quiz.id, Answers::from([(0, 1), (1, 0)]))
        .await
        .unwrap();
    assert_eq!(failed.score_percent, 0);
    assert!(!is_course_complete_for(&store, user.id, &course).await.unwrap());

    let passed = submit_attempt(&store, user.id, quiz.id, Answers::from([(0, 0), (1, 2)]))
        .await
        .unwrap();
    assert_eq!(passed.score_percent, 50);
    assert!(passed.passed);
    assert!(is_course_complete_for(&store, user.id, &course).await.unwrap());
    assert!(issue_certificate(&store, &user, &course).await.is_ok());
}

#[tokio::test]
async fn empty_course_never_issues_a_certificate() {
    let store = InMemoryStore::new();
    let course = course(0);
    store.add_course(course.clone()).await;
    let user = student();

    assert!(!is_course_complete_for(&store, user.id, &course).await.unwrap());
    assert!(matches!(
        issue_certificate(&store, &user, &course).await,
        Err(CourseError::NotEligible)
    ));
}

#[tokio::test]
async fn another_users_progress_does_not_count() {
    let store = InMemoryStore::new();
    let course = course(1);
    store.add_course(course.clone()).await;
    let finisher = student();
    let bystander = student();

    mark_lesson_complete(&store, finisher.id, course.lessons[0].id)
        .await
        .unwrap();

    assert!(is_course_complete_for(&store, finisher.id, &course).await.unwrap());
    assert!(!is_course_complete_for(&store, bystander.id, &course).await.unwrap());
}
