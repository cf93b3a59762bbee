use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::services::browse_service::{self, SwipeDecision};
use crate::web::routes::browse::swipe_response;
use crate::web::{error_response, AppState};

#[derive(Debug, Deserialize)]
pub struct AdmirerSwipeForm {
    pub target_id: i64,
    pub decision: SwipeDecision,
}

pub async fn next_admirer_handler(
    Path(user_id): Path<i64>,
    State(app): State<AppState>,
) -> Response {
    match browse_service::browse_next_admirer(&app.pool, &app.cache, &app.sessions, user_id).await
    {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Browse next admirer", e),
    }
}

pub async fn swipe_admirer_handler(
    Path(user_id): Path<i64>,
    State(app): State<AppState>,
    Json(form): Json<AdmirerSwipeForm>,
) -> Response {
    let result = browse_service::swipe_admirer(
        &app.pool,
        &app.cache,
        &app.sessions,
        app.notifier.as_ref(),
        user_id,
        form.target_id,
        form.decision,
    )
    .await;

    match result {
        Ok(r) => Json(swipe_response(r, "declined")).into_response(),
        Err(e) => error_response("Swipe admirer", e),
    }
}
