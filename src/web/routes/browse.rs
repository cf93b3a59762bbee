use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::CandidateProfile;
use crate::services::browse_service::{self, SwipeDecision, SwipeResult};
use crate::services::match_service::LikeOutcome;
use crate::web::{error_response, AppState};

#[derive(Debug, Deserialize)]
pub struct SwipeForm {
    pub target_id: i64,
    pub decision: SwipeDecision,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub outcome: &'static str,
    pub matched: bool,
    pub next: Option<CandidateProfile>,
}

pub fn swipe_response(result: SwipeResult, dismissed: &'static str) -> SwipeResponse {
    let (outcome, matched) = match result.like {
        Some(LikeOutcome::Created { matched }) => ("created", matched),
        Some(LikeOutcome::Duplicate) => ("duplicate", false),
        None => (dismissed, false),
    };
    SwipeResponse {
        outcome,
        matched,
        next: result.next,
    }
}

pub async fn browse_next_handler(
    Path(user_id): Path<i64>,
    State(app): State<AppState>,
) -> Response {
    match browse_service::browse_next(&app.pool, &app.cache, &app.sessions, user_id).await {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Browse next", e),
    }
}

pub async fn swipe_handler(
    Path(user_id): Path<i64>,
    State(app): State<AppState>,
    Json(form): Json<SwipeForm>,
) -> Response {
    let result = browse_service::swipe(
        &app.pool,
        &app.cache,
        &app.sessions,
        app.notifier.as_ref(),
        user_id,
        form.target_id,
        form.decision,
        form.message.as_deref(),
    )
    .await;

    match result {
        Ok(r) => Json(swipe_response(r, "passed")).into_response(),
        Err(e) => error_response("Swipe", e),
    }
}
