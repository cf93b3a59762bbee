use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::UserRow;

pub const SQL_LOAD_USER: &str = r#"
SELECT
    id,
    username,
    gender,
    age,
    city_id,
    bio,
    is_active,
    rating,
    created_at,
    updated_at
FROM users
WHERE id = ?1
LIMIT 1
"#;

pub const SQL_UPSERT_USER: &str = r#"
INSERT INTO users (id, username, gender, age, city_id, bio)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT (id) DO UPDATE SET
    username = excluded.username,
    gender = excluded.gender,
    age = excluded.age,
    city_id = excluded.city_id,
    bio = excluded.bio,
    updated_at = datetime('now')
"#;

pub const SQL_SET_ACTIVE: &str = r#"
UPDATE users
SET is_active = ?2,
    updated_at = datetime('now')
WHERE id = ?1
"#;

// Denormalized popularity: the number of live likes pointing at the user.
pub const SQL_UPDATE_RATING: &str = r#"
UPDATE users
SET rating = (
        SELECT COUNT(*)
        FROM likes
        WHERE to_user_id = ?1
          AND expires_at > ?2
    ),
    updated_at = datetime('now')
WHERE id = ?1
"#;

pub struct NewUser<'a> {
    pub id: i64,
    pub username: Option<&'a str>,
    pub gender: &'a str,
    pub age: i64,
    pub city_id: Option<i64>,
    pub bio: Option<&'a str>,
}

pub async fn load_user(pool: &SqlitePool, user_id: i64) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_LOAD_USER)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn upsert_user(pool: &SqlitePool, user: NewUser<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_UPSERT_USER)
        .bind(user.id)
        .bind(user.username)
        .bind(user.gender)
        .bind(user.age)
        .bind(user.city_id)
        .bind(user.bio)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_active(pool: &SqlitePool, user_id: i64, is_active: bool) -> sqlx::Result<()> {
    sqlx::query(SQL_SET_ACTIVE)
        .bind(user_id)
        .bind(is_active)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_rating(
    pool: &SqlitePool,
    user_id: i64,
    now: DateTime<Utc>,
) -> sqlx::Result<()> {
    sqlx::query(SQL_UPDATE_RATING)
        .bind(user_id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(())
}
