use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::LikeRow;

pub const SQL_INSERT_LIKE: &str = r#"
INSERT INTO likes (from_user_id, to_user_id, message, created_at, expires_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SQL_DELETE_LIKE: &str = r#"
DELETE FROM likes
WHERE from_user_id = ?1
  AND to_user_id = ?2
"#;

pub const SQL_FIND_LIVE_LIKE: &str = r#"
SELECT
    id,
    from_user_id,
    to_user_id,
    message,
    created_at,
    expires_at
FROM likes
WHERE from_user_id = ?1
  AND to_user_id = ?2
  AND expires_at > ?3
LIMIT 1
"#;

pub const SQL_LIST_LIVE_LIKES_TO: &str = r#"
SELECT
    id,
    from_user_id,
    to_user_id,
    message,
    created_at,
    expires_at
FROM likes
WHERE to_user_id = ?1
  AND expires_at > ?2
ORDER BY id
"#;

/// Result of a like insert: the pair constraint turns a concurrent or
/// repeated insert into `Duplicate` instead of a second edge.
#[derive(Debug, PartialEq, Eq)]
pub enum LikeInsert {
    Inserted,
    Duplicate,
}

pub struct NewLike<'a> {
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub message: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub async fn insert_like(pool: &SqlitePool, like: NewLike<'_>) -> sqlx::Result<LikeInsert> {
    let result = sqlx::query(SQL_INSERT_LIKE)
        .bind(like.from_user_id)
        .bind(like.to_user_id)
        .bind(like.message)
        .bind(like.created_at)
        .bind(like.expires_at)
        .execute(pool)
        .await;

    match result {
        Ok(_) => Ok(LikeInsert::Inserted),
        Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => {
            Ok(LikeInsert::Duplicate)
        }
        Err(e) => Err(e),
    }
}

/// Deletes the directed edge; returns the number of rows removed so callers
/// can tell a no-op from an actual delete.
pub async fn delete_like(pool: &SqlitePool, from_user_id: i64, to_user_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_DELETE_LIKE)
        .bind(from_user_id)
        .bind(to_user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn find_live_like(
    pool: &SqlitePool,
    from_user_id: i64,
    to_user_id: i64,
    now: DateTime<Utc>,
) -> sqlx::Result<Option<LikeRow>> {
    sqlx::query_as::<_, LikeRow>(SQL_FIND_LIVE_LIKE)
        .bind(from_user_id)
        .bind(to_user_id)
        .bind(now)
        .fetch_optional(pool)
        .await
}

pub async fn list_live_likes_to(
    pool: &SqlitePool,
    to_user_id: i64,
    now: DateTime<Utc>,
) -> sqlx::Result<Vec<LikeRow>> {
    sqlx::query_as::<_, LikeRow>(SQL_LIST_LIVE_LIKES_TO)
        .bind(to_user_id)
        .bind(now)
        .fetch_all(pool)
        .await
}
