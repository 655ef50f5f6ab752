//! services/api/src/web/middleware.rs
//!
//! Identity middleware for protected routes.

use academy_core::domain::User;
use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use tracing::warn;
use uuid::Uuid;

/// Header carrying the caller's id, set by the identity provider's proxy.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's display name.
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Builds the calling `User` from the identity headers and inserts it into
/// request extensions for handlers to use.
///
/// The identity provider has already authenticated the caller; this only
/// refuses requests where the headers are missing or malformed.
pub async fn require_identity(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let headers = req.headers();

    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or_else(|| {
            warn!("Rejected request without a valid {} header", USER_ID_HEADER);
            StatusCode::UNAUTHORIZED
        })?;

    let display_name = headers
        .get(USER_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("Foydalanuvchi")
        .to_string();

    req.extensions_mut().insert(User {
        id: user_id,
        display_name,
    });

    Ok(next.run(req).await)
}
