use serde::Serialize;

// Snapshot row served to the browsing user and stored in the result cache
// (latitude/longitude come from the candidate's city, distance is computed
// against the requester afterwards).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CandidateProfile {
    pub id: i64,
    pub username: Option<String>,
    pub gender: String,
    pub age: i64,
    pub city_id: Option<i64>,
    pub bio: Option<String>,
    pub rating: i64,
    #[serde(skip)]
    pub latitude: Option<f64>,
    #[serde(skip)]
    pub longitude: Option<f64>,
    #[sqlx(skip)]
    pub distance_km: Option<f64>,
}
