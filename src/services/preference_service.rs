use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::preference_repo;
use crate::error::CoreError;
use crate::models::UserPreferencesRow;
use crate::services::browse_service;
use crate::services::result_cache::ResultCache;
use crate::services::session_service::SessionStore;

#[derive(Debug, Deserialize)]
pub struct PreferencesUpdate {
    pub min_age: i64,
    pub max_age: i64,
    pub gender_preference: String,
    pub max_distance_km: i64,
}

/// Replaces the user's search preferences, then rewinds their candidate
/// browsing: stale cached pages are dropped and the cursor starts over.
pub async fn update_preferences(
    pool: &SqlitePool,
    cache: &ResultCache,
    sessions: &SessionStore,
    user_id: i64,
    update: PreferencesUpdate,
) -> Result<(), CoreError> {
    validate(&update)?;

    preference_repo::upsert_preferences(
        pool,
        &UserPreferencesRow {
            user_id,
            min_age: update.min_age,
            max_age: update.max_age,
            gender_preference: update.gender_preference,
            max_distance_km: update.max_distance_km,
        },
    )
    .await?;

    browse_service::invalidate_on_preference_change(cache, sessions, user_id).await;
    Ok(())
}

fn validate(update: &PreferencesUpdate) -> Result<(), CoreError> {
    if !(10..=100).contains(&update.min_age) || !(10..=100).contains(&update.max_age) {
        return Err(CoreError::InvalidInput("ages must be between 10 and 100"));
    }
    if update.max_age < update.min_age {
        return Err(CoreError::InvalidInput("max age must not be below min age"));
    }
    if update.max_distance_km <= 0 {
        return Err(CoreError::InvalidInput("search distance must be positive"));
    }
    match update.gender_preference.as_str() {
        "m" | "f" | "a" => Ok(()),
        _ => Err(CoreError::InvalidInput(
            "gender preference must be one of m, f, a",
        )),
    }
}
