//! crates/academy_core/src/grading.rs
//!
//! Grades quiz submissions and records them as immutable attempts.

use crate::domain::{Answers, Quiz, QuizAttempt};
use crate::error::CourseResult;
use crate::ports::LearningStore;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

/// The outcome of grading one set of answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub correct_count: usize,
    pub total_questions: usize,
    pub score_percent: u8,
    pub passed: bool,
}

impl Grade {
    /// A quiz without questions cannot be failed: 100%, passed.
    pub fn vacuous() -> Self {
        Self {
            correct_count: 0,
            total_questions: 0,
            score_percent: 100,
            passed: true,
        }
    }
}

/// `round(100 * correct / total)`, halves rounded up.
fn percent(correct: usize, total: usize) -> u8 {
    debug_assert!(total > 0 && correct <= total);
    ((200 * correct + total) / (2 * total)) as u8
}

/// Compares every submitted answer against the key.
///
/// Missing answers and out-of-range option indices count as wrong.
/// Answers for question indices the quiz does not have are ignored.
pub fn grade_attempt(quiz: &Quiz, answers: &Answers) -> Grade {
    let total_questions = quiz.questions.len();
    if total_questions == 0 {
        return Grade::vacuous();
    }

    let correct_count = quiz
        .questions
        .iter()
        .enumerate()
        .filter(|(index, question)| answers.get(index) == Some(&question.correct_option_index))
        .count();
    let score_percent = percent(correct_count, total_questions);

    Grade {
        correct_count,
        total_questions,
        score_percent,
        passed: score_percent >= quiz.passing_score_percent,
    }
}

/// Grades `answers` for `quiz_id` and appends the result as a new attempt.
pub async fn submit_attempt(
    store: &dyn LearningStore,
    user_id: Uuid,
    quiz_id: Uuid,
    answers: Answers,
) -> CourseResult<QuizAttempt> {
    let quiz = store.get_quiz(quiz_id).await?;
    quiz.validate()?;

    let grade = grade_attempt(&quiz, &answers);
    let attempt = QuizAttempt {
        id: Uuid::new_v4(),
        user_id,
        quiz_id,
        answers,
        score_percent: grade.score_percent,
        passed: grade.passed,
        submitted_at: Utc::now(),
    };
    store.append_attempt(attempt.clone()).await?;

    info!(
        "Quiz {} attempt by user {}: {}/{} correct, {}% (passed: {})",
        quiz_id,
        user_id,
        grade.correct_count,
        grade.total_questions,
        grade.score_percent,
        grade.passed
    );
    Ok(attempt)
}

/// Highest-scoring attempt; the earliest one wins a tie.
pub fn best_attempt(attempts: &[QuizAttempt]) -> Option<&QuizAttempt> {
    attempts.iter().fold(None, |best, attempt| match best {
        Some(b) if b.score_percent > attempt.score_percent => Some(b),
        Some(b)
            if b.score_percent == attempt.score_percent
                && b.submitted_at <= attempt.submitted_at =>
        {
            Some(b)
        }
        _ => Some(attempt),
    })
}
