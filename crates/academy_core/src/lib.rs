pub mod certificate;
pub mod completion;
pub mod domain;
pub mod error;
pub mod grading;
pub mod memory;
pub mod ports;
pub mod progress;
pub mod social;

pub use certificate::{issue_certificate, verification_id};
pub use completion::{course_status, evaluate, is_course_complete, is_course_complete_for, CompletionStatus, QuizRequirement};
pub use domain::{
    Answers, Certificate, Course, Lesson, LessonCompletion, Platform, PublishReceipt, Question, Quiz,
    QuizAttempt, QuizDefinitionError, SocialPost, User,
};
pub use error::{CourseError, CourseResult};
pub use grading::{best_attempt, grade_attempt, submit_attempt, Grade};
pub use ports::{LearningStore, PortError, PortResult, SocialPublisher};
pub use progress::{completed_lesson_ids, mark_lesson_complete};
pub use social::{publish_everywhere, PublishOutcome};
