use sqlx::SqlitePool;

use crate::models::BlockRow;

pub const SQL_LIST_BLOCKS: &str = r#"
SELECT
    id,
    blocker_id,
    blocked_id
FROM blocks
WHERE blocker_id = ?1
   OR blocked_id = ?1
ORDER BY id
"#;

// Both directions: an edge in either orientation hides the pair from each
// other, so callers get the full set touching the user.
pub async fn list_blocks(pool: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<BlockRow>> {
    sqlx::query_as::<_, BlockRow>(SQL_LIST_BLOCKS)
        .bind(user_id)
        .fetch_all(pool)
        .await
}
