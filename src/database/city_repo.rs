use sqlx::SqlitePool;

use crate::models::CityRow;

pub const SQL_LOAD_CITY: &str = r#"
SELECT
    id,
    name,
    latitude,
    longitude
FROM cities
WHERE id = ?1
LIMIT 1
"#;

pub const SQL_FIND_CITY_ID_BY_NAME: &str = r#"
SELECT id
FROM cities
WHERE name = ?1 COLLATE NOCASE
LIMIT 1
"#;

pub async fn load_city(pool: &SqlitePool, city_id: i64) -> sqlx::Result<Option<CityRow>> {
    sqlx::query_as::<_, CityRow>(SQL_LOAD_CITY)
        .bind(city_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_city_id_by_name(pool: &SqlitePool, name: &str) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar::<_, i64>(SQL_FIND_CITY_ID_BY_NAME)
        .bind(name.trim())
        .fetch_optional(pool)
        .await
}
