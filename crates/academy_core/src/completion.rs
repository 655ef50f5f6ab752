//! crates/academy_core/src/completion.rs
//!
//! Decides whether a user has satisfied every requirement of a course.

use crate::domain::Course;
use crate::error::CourseResult;
use crate::ports::LearningStore;
use crate::progress::completed_lesson_ids;
use std::collections::HashSet;
use uuid::Uuid;

/// Where the user stands with respect to the course quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizRequirement {
    /// The course has no quiz.
    NotRequired,
    /// A quiz exists and no attempt has passed it yet.
    Pending,
    Passed,
}

impl QuizRequirement {
    fn satisfied(self) -> bool {
        !matches!(self, QuizRequirement::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionStatus {
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub quiz: QuizRequirement,
    pub complete: bool,
}

impl CompletionStatus {
    /// Share of lessons done, 0..=100.
    pub fn lesson_percent(&self) -> u8 {
        if self.total_lessons == 0 {
            return 0;
        }
        (self.completed_lessons * 100 / self.total_lessons) as u8
    }
}

/// Evaluates completion from already-loaded facts. Pure.
///
/// A course with no lessons is never complete.
pub fn evaluate(completed: &HashSet<Uuid>, course: &Course, quiz: QuizRequirement) -> CompletionStatus {
    let total_lessons = course.lessons.len();
    let completed_lessons = course.lesson_ids().filter(|id| completed.contains(id)).count();
    let complete = total_lessons > 0 && completed_lessons == total_lessons && quiz.satisfied();

    CompletionStatus {
        completed_lessons,
        total_lessons,
        quiz,
        complete,
    }
}

pub fn is_course_complete(completed: &HashSet<Uuid>, course: &Course, quiz: QuizRequirement) -> bool {
    evaluate(completed, course, quiz).complete
}

/// Loads the ledger, quiz and attempts for `user_id` and evaluates `course`.
pub async fn course_status(
    store: &dyn LearningStore,
    user_id: Uuid,
    course: &Course,
) -> CourseResult<CompletionStatus> {
    let completed = completed_lesson_ids(store, user_id, course.id).await?;
    let quiz = match store.get_quiz_for_course(course.id).await? {
        None => QuizRequirement::NotRequired,
        Some(quiz) => {
            let attempts = store.get_attempts(user_id, quiz.id).await?;
            if attempts.iter().any(|a| a.passed) {
                QuizRequirement::Passed
            } else {
                QuizRequirement::Pending
            }
        }
    };
    Ok(evaluate(&completed, course, quiz))
}

pub async fn is_course_complete_for(
    store: &dyn LearningStore,
    user_id: Uuid,
    course: &Course,
) -> CourseResult<bool> {
    Ok(course_status(store, user_id, course).await?.complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Lesson;

    fn course_with(lessons: usize) -> Course {
        let id = Uuid::new_v4();
        Course {
            id,
            slug: "ai-asoslari".to_string(),
            title: "Sun'iy intellekt asoslari".to_string(),
            lessons: (0..lessons)
                .map(|i| Lesson {
                    id: Uuid::new_v4(),
                    course_id: id,
                    title: format!("Dars {}", i + 1),
                    position: i as i32,
                })
                .collect(),
        }
    }

    #[test]
    fn zero_lesson_course_is_never_complete() {
        let course = course_with(0);
        let empty = HashSet::new();
        assert!(!is_course_complete(&empty, &course, QuizRequirement::NotRequired));
        assert!(!is_course_complete(&empty, &course, QuizRequirement::Passed));
        assert_eq!(evaluate(&empty, &course, QuizRequirement::NotRequired).lesson_percent(), 0);
    }

    #[test]
    fn all_lessons_without_quiz_is_complete() {
        let course = course_with(3);
        let done: HashSet<Uuid> = course.lesson_ids().collect();
        assert!(is_course_complete(&done, &course, QuizRequirement::NotRequired));
    }

    #[test]
    fn pending_quiz_blocks_completion() {
        let course = course_with(2);
        let done: HashSet<Uuid> = course.lesson_ids().collect();
        assert!(!is_course_complete(&done, &course, QuizRequirement::Pending));
        assert!(is_course_complete(&done, &course, QuizRequirement::Passed));
    }

    #[test]
    fn completions_outside_the_course_do_not_count() {
        let course = course_with(2);
        let done: HashSet<Uuid> = [course.lessons[0].id, Uuid::new_v4()].into_iter().collect();
        let status = evaluate(&done, &course, QuizRequirement::NotRequired);
        assert_eq!(status.completed_lessons, 1);
        assert_eq!(status.lesson_percent(), 50);
        assert!(!status.complete);
    }
}
