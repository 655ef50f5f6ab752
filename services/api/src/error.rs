//! services/api/src/error.rs
//!
//! Defines the primary error type for the API service and the mapping of
//! course errors onto HTTP responses.

use crate::config::ConfigError;
use academy_core::{CourseError, PortError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a failed course operation.
    #[error("Course Error: {0}")]
    Course(#[from] CourseError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying schema migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The JSON body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Course(CourseError::NotEligible) => StatusCode::FORBIDDEN,
        ApiError::Course(CourseError::NotFound(_)) | ApiError::Port(PortError::NotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        ApiError::Course(CourseError::InvalidQuiz(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            match &self {
                ApiError::Course(inner) => inner.to_string(),
                other => other.to_string(),
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
