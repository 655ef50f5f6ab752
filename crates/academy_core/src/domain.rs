//! crates/academy_core/src/domain.rs
//!
//! Defines the pure, core data structures for course progress and certification.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Submitted answers: question index -> chosen option index.
pub type Answers = BTreeMap<usize, usize>;

/// The caller as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub position: i32,
}

/// A course and its lessons, ordered by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

impl Course {
    pub fn lesson_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.lessons.iter().map(|l| l.id)
    }

    pub fn has_lesson(&self, lesson_id: Uuid) -> bool {
        self.lessons.iter().any(|l| l.id == lesson_id)
    }
}

/// Record that a user finished a specific lesson. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCompletion {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub lesson_id: Uuid,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
    pub explanation: Option<String>,
}

/// The (optional) quiz attached to a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub id: Uuid,
    pub course_id: Uuid,
    pub passing_score_percent: u8,
    pub questions: Vec<Question>,
}

/// Reasons a quiz definition is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizDefinitionError {
    #[error("passing score {0}% is above 100%")]
    ThresholdOutOfRange(u8),
    #[error("question {0} has fewer than two options")]
    TooFewOptions(usize),
    #[error("question {index} marks option {correct} correct but has only {len} options")]
    CorrectOptionOutOfRange {
        index: usize,
        correct: usize,
        len: usize,
    },
    #[error("course {0} already has a quiz")]
    CourseAlreadyHasQuiz(Uuid),
}

impl Quiz {
    /// Checks the threshold range and every question's option invariants.
    pub fn validate(&self) -> Result<(), QuizDefinitionError> {
        if self.passing_score_percent > 100 {
            return Err(QuizDefinitionError::ThresholdOutOfRange(
                self.passing_score_percent,
            ));
        }
        for (index, question) in self.questions.iter().enumerate() {
            let len = question.options.len();
            if len < 2 {
                return Err(QuizDefinitionError::TooFewOptions(index));
            }
            if question.correct_option_index >= len {
                return Err(QuizDefinitionError::CorrectOptionOutOfRange {
                    index,
                    correct: question.correct_option_index,
                    len,
                });
            }
        }
        Ok(())
    }
}

/// A scored, immutable submission of answers to a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quiz_id: Uuid,
    pub answers: Answers,
    pub score_percent: u8,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

/// A derived, recomputed-on-view proof of course completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub user_name: String,
    pub course_title: String,
    pub completion_date: DateTime<Utc>,
    pub verification_id: String,
}

/// A piece of content to cross-post to social platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialPost {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Telegram,
    Facebook,
    Instagram,
    LinkedIn,
    X,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Telegram => "telegram",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::LinkedIn => "linkedin",
            Platform::X => "x",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a platform reported back after a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub platform: Platform,
    pub external_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, correct: usize) -> Question {
        Question {
            text: "Savol".to_string(),
            options: (0..options).map(|i| format!("Variant {}", i)).collect(),
            correct_option_index: correct,
            explanation: None,
        }
    }

    fn quiz(passing: u8, questions: Vec<Question>) -> Quiz {
        Quiz {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            passing_score_percent: passing,
            questions,
        }
    }

    #[test]
    fn valid_quiz_passes_validation() {
        assert!(quiz(70, vec![question(2, 1), question(4, 0)]).validate().is_ok());
        assert!(quiz(0, vec![]).validate().is_ok());
    }

    #[test]
    fn rejects_threshold_above_hundred() {
        assert_eq!(
            quiz(101, vec![]).validate(),
            Err(QuizDefinitionError::ThresholdOutOfRange(101))
        );
    }

    #[test]
    fn rejects_single_option_question() {
        assert_eq!(
            quiz(50, vec![question(3, 0), question(1, 0)]).validate(),
            Err(QuizDefinitionError::TooFewOptions(1))
        );
    }

    #[test]
    fn rejects_correct_index_past_options() {
        assert_eq!(
            quiz(50, vec![question(3, 3)]).validate(),
            Err(QuizDefinitionError::CorrectOptionOutOfRange {
                index: 0,
                correct: 3,
                len: 3
            })
        );
    }
}
