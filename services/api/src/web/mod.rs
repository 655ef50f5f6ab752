pub mod middleware;
pub mod rest;
pub mod state;

pub use middleware::require_identity;
pub use rest::{
    certificate_handler, complete_lesson_handler, course_progress_handler, list_attempts_handler,
    share_handler, submit_attempt_handler, ApiDoc,
};

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application router: identity-protected API routes
/// plus the Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/lessons/{lesson_id}/complete", post(complete_lesson_handler))
        .route("/courses/{slug}/progress", get(course_progress_handler))
        .route("/courses/{slug}/certificate", get(certificate_handler))
        .route(
            "/quizzes/{quiz_id}/attempts",
            post(submit_attempt_handler).get(list_attempts_handler),
        )
        .route("/social/share", post(share_handler))
        .layer(axum_middleware::from_fn(require_identity))
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
