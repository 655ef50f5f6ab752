//! crates/academy_core/src/certificate.rs
//!
//! Issues certificate views. Nothing is written: a certificate is recomputed
//! from the ledger each time it is requested.

use crate::completion::course_status;
use crate::domain::{Certificate, Course, User};
use crate::error::{CourseError, CourseResult};
use crate::ports::LearningStore;
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

const VERIFICATION_ID_LEN: usize = 12;

/// A stable display identifier for a user's certificates.
///
/// Not a signature; anyone who knows the user id can reproduce it.
pub fn verification_id(user_id: Uuid) -> String {
    let digest = Sha256::digest(user_id.to_string().as_bytes());
    let mut id = hex::encode_upper(digest);
    id.truncate(VERIFICATION_ID_LEN);
    id
}

/// Builds the certificate for `user` in `course`, or `NotEligible`.
pub async fn issue_certificate(
    store: &dyn LearningStore,
    user: &User,
    course: &Course,
) -> CourseResult<Certificate> {
    let status = course_status(store, user.id, course).await?;
    if !status.complete {
        return Err(CourseError::NotEligible);
    }

    let completion_date = store
        .get_completions(user.id, course.id)
        .await?
        .into_iter()
        .filter(|c| course.has_lesson(c.lesson_id))
        .map(|c| c.completed_at)
        .max()
        .ok_or(CourseError::NotEligible)?;

    info!("Certificate for course {} viewed by user {}", course.id, user.id);

    Ok(Certificate {
        user_name: user.display_name.clone(),
        course_title: course.title.clone(),
        completion_date,
        verification_id: verification_id(user.id),
    })
}
