// gender_preference is 'm', 'f' or 'a' (no filter).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserPreferencesRow {
    pub user_id: i64,
    pub min_age: i64,
    pub max_age: i64,
    pub gender_preference: String,
    pub max_distance_km: i64,
}
