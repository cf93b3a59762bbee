#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: Option<String>,
    pub gender: String,
    pub age: i64,
    pub city_id: Option<i64>,
    pub bio: Option<String>,
    pub is_active: bool,
    pub rating: i64,
    pub created_at: String,
    pub updated_at: String,
}
