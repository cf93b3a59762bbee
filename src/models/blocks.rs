#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlockRow {
    pub id: i64,
    pub blocker_id: i64,
    pub blocked_id: i64,
}
