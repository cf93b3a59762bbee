#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CityRow {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}
