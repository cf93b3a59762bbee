use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::services::preference_service::{self, PreferencesUpdate};
use crate::web::{error_response, AppState};

pub async fn update_preferences_handler(
    Path(user_id): Path<i64>,
    State(app): State<AppState>,
    Json(form): Json<PreferencesUpdate>,
) -> Response {
    let result = preference_service::update_preferences(
        &app.pool,
        &app.cache,
        &app.sessions,
        user_id,
        form,
    )
    .await;

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Preferences update", e),
    }
}
