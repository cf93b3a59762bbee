pub mod routes;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sqlx::SqlitePool;
use tracing::warn;

use crate::error::CoreError;
use crate::services::notify_service::Notifier;
use crate::services::result_cache::ResultCache;
use crate::services::session_service::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub cache: Arc<ResultCache>,
    pub sessions: Arc<SessionStore>,
    pub notifier: Arc<dyn Notifier>,
}

// NotReady is the caller's problem to present nicely, not something to log
// loudly; store failures are.
pub fn error_response(context: &str, err: CoreError) -> Response {
    match err {
        CoreError::NotReady { .. } => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "error": "onboarding_incomplete" })),
        )
            .into_response(),
        CoreError::InvalidInput(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": msg })),
        )
            .into_response(),
        other => {
            warn!("{} failed: {}", context, other);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
