use sqlx::SqlitePool;

use crate::models::UserPreferencesRow;

pub const SQL_LOAD_PREFERENCES: &str = r#"
SELECT
    user_id,
    min_age,
    max_age,
    gender_preference,
    max_distance_km
FROM user_preferences
WHERE user_id = ?1
LIMIT 1
"#;

pub const SQL_UPSERT_PREFERENCES: &str = r#"
INSERT INTO user_preferences (user_id, min_age, max_age, gender_preference, max_distance_km)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (user_id) DO UPDATE SET
    min_age = excluded.min_age,
    max_age = excluded.max_age,
    gender_preference = excluded.gender_preference,
    max_distance_km = excluded.max_distance_km,
    updated_at = datetime('now')
"#;

pub async fn load_preferences(
    pool: &SqlitePool,
    user_id: i64,
) -> sqlx::Result<Option<UserPreferencesRow>> {
    sqlx::query_as::<_, UserPreferencesRow>(SQL_LOAD_PREFERENCES)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn upsert_preferences(
    pool: &SqlitePool,
    prefs: &UserPreferencesRow,
) -> sqlx::Result<()> {
    sqlx::query(SQL_UPSERT_PREFERENCES)
        .bind(prefs.user_id)
        .bind(prefs.min_age)
        .bind(prefs.max_age)
        .bind(&prefs.gender_preference)
        .bind(prefs.max_distance_km)
        .execute(pool)
        .await?;
    Ok(())
}
