//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorBody};
use crate::web::state::AppState;
use academy_core::completion::{course_status, QuizRequirement};
use academy_core::domain::{Answers, QuizAttempt, SocialPost, User};
use academy_core::social::publish_everywhere;
use academy_core::{best_attempt, issue_certificate, mark_lesson_complete, submit_attempt};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        complete_lesson_handler,
        course_progress_handler,
        submit_attempt_handler,
        list_attempts_handler,
        certificate_handler,
        share_handler,
    ),
    components(
        schemas(
            CompletionResponse,
            ProgressResponse,
            QuizStatus,
            SubmitAttemptRequest,
            AttemptResponse,
            AttemptsResponse,
            CertificateResponse,
            ShareRequest,
            ShareResult,
            ShareResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "Academy API", description = "Course progress, quizzes, certificates and cross-posting.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CompletionResponse {
    pub lesson_id: Uuid,
    pub course_id: Uuid,
    pub completed_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuizStatus {
    NotRequired,
    Pending,
    Passed,
}

impl From<QuizRequirement> for QuizStatus {
    fn from(req: QuizRequirement) -> Self {
        match req {
            QuizRequirement::NotRequired => QuizStatus::NotRequired,
            QuizRequirement::Pending => QuizStatus::Pending,
            QuizRequirement::Passed => QuizStatus::Passed,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ProgressResponse {
    pub course_id: Uuid,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub lesson_percent: u8,
    pub quiz: QuizStatus,
    pub complete: bool,
}

/// Answers keyed by question index (as a string), valued by chosen option index.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SubmitAttemptRequest {
    #[schema(value_type = Object)]
    pub answers: Answers,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AttemptResponse {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub score_percent: u8,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

impl From<&QuizAttempt> for AttemptResponse {
    fn from(attempt: &QuizAttempt) -> Self {
        Self {
            id: attempt.id,
            quiz_id: attempt.quiz_id,
            score_percent: attempt.score_percent,
            passed: attempt.passed,
            submitted_at: attempt.submitted_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AttemptsResponse {
    pub attempts: Vec<AttemptResponse>,
    pub best_score_percent: Option<u8>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CertificateResponse {
    pub user_name: String,
    pub course_title: String,
    pub completion_date: DateTime<Utc>,
    pub verification_id: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ShareRequest {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ShareResult {
    pub platform: String,
    pub ok: bool,
    pub external_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ShareResponse {
    pub results: Vec<ShareResult>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Mark a lesson as completed by the caller. Repeating the call is harmless.
#[utoipa::path(
    post,
    path = "/lessons/{lesson_id}/complete",
    params(("lesson_id" = Uuid, Path, description = "The lesson that was finished.")),
    responses(
        (status = 200, description = "Completion recorded (or already present)", body = CompletionResponse),
        (status = 401, description = "Missing identity"),
        (status = 404, description = "Unknown lesson", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn complete_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(lesson_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let completion = mark_lesson_complete(state.store.as_ref(), user.id, lesson_id).await?;
    Ok(Json(CompletionResponse {
        lesson_id: completion.lesson_id,
        course_id: completion.course_id,
        completed_at: completion.completed_at,
    }))
}

/// The caller's progress through a course.
#[utoipa::path(
    get,
    path = "/courses/{slug}/progress",
    params(("slug" = String, Path, description = "Course slug.")),
    responses(
        (status = 200, description = "Current progress", body = ProgressResponse),
        (status = 404, description = "Unknown course", body = ErrorBody)
    )
)]
pub async fn course_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.as_ref();
    let course = store.get_course_by_slug(&slug).await?;
    let status = course_status(store, user.id, &course).await?;
    Ok(Json(ProgressResponse {
        course_id: course.id,
        completed_lessons: status.completed_lessons,
        total_lessons: status.total_lessons,
        lesson_percent: status.lesson_percent(),
        quiz: status.quiz.into(),
        complete: status.complete,
    }))
}

/// Submit answers to a quiz. Every submission is stored as a new attempt.
#[utoipa::path(
    post,
    path = "/quizzes/{quiz_id}/attempts",
    params(("quiz_id" = Uuid, Path, description = "The quiz being answered.")),
    request_body = SubmitAttemptRequest,
    responses(
        (status = 201, description = "Attempt graded and stored", body = AttemptResponse),
        (status = 404, description = "Unknown quiz", body = ErrorBody),
        (status = 422, description = "Quiz definition is invalid", body = ErrorBody)
    )
)]
pub async fn submit_attempt_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(quiz_id): Path<Uuid>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let attempt = submit_attempt(state.store.as_ref(), user.id, quiz_id, req.answers).await?;
    Ok((StatusCode::CREATED, Json(AttemptResponse::from(&attempt))))
}

/// The caller's attempts at a quiz, oldest first.
#[utoipa::path(
    get,
    path = "/quizzes/{quiz_id}/attempts",
    params(("quiz_id" = Uuid, Path, description = "The quiz.")),
    responses(
        (status = 200, description = "Attempts so far", body = AttemptsResponse),
        (status = 404, description = "Unknown quiz", body = ErrorBody)
    )
)]
pub async fn list_attempts_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.as_ref();
    store.get_quiz(quiz_id).await?;
    let attempts = store.get_attempts(user.id, quiz_id).await?;
    Ok(Json(AttemptsResponse {
        best_score_percent: best_attempt(&attempts).map(|a| a.score_percent),
        attempts: attempts.iter().map(AttemptResponse::from).collect(),
    }))
}

/// The caller's certificate for a course, recomputed on every request.
#[utoipa::path(
    get,
    path = "/courses/{slug}/certificate",
    params(("slug" = String, Path, description = "Course slug.")),
    responses(
        (status = 200, description = "Certificate view", body = CertificateResponse),
        (status = 403, description = "Course requirements not met", body = ErrorBody),
        (status = 404, description = "Unknown course", body = ErrorBody)
    )
)]
pub async fn certificate_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.as_ref();
    let course = store.get_course_by_slug(&slug).await?;
    let certificate = issue_certificate(store, &user, &course).await?;
    Ok(Json(CertificateResponse {
        user_name: certificate.user_name,
        course_title: certificate.course_title,
        completion_date: certificate.completion_date,
        verification_id: certificate.verification_id,
    }))
}

/// Cross-post a piece of content to every configured platform.
#[utoipa::path(
    post,
    path = "/social/share",
    request_body = ShareRequest,
    responses(
        (status = 200, description = "Per-platform outcomes", body = ShareResponse)
    )
)]
pub async fn share_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ShareRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = SocialPost {
        title: req.title,
        summary: req.summary,
        url: req.url,
        image_url: req.image_url.filter(|u| !u.trim().is_empty()),
    };
    let outcomes = publish_everywhere(&state.publishers, &post).await;

    let results = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(receipt) => ShareResult {
                platform: outcome.platform.to_string(),
                ok: true,
                external_id: receipt.external_id,
                error: None,
            },
            Err(e) => ShareResult {
                platform: outcome.platform.to_string(),
                ok: false,
                external_id: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    Ok(Json(ShareResponse { results }))
}
