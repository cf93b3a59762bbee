use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::CandidateProfile;

// Eligibility is decided entirely in SQL so LIMIT/OFFSET pagination stays
// stable: self-exclusion, active flag, block edges in either direction, the
// requester's age/gender window, and the great-circle distance between the
// two cities (haversine over the stored coordinates, in kilometers).
//
// Ordering by (rating DESC, id ASC) is total, which keeps page offsets
// deterministic across repeated calls over the same data.
pub const SQL_CANDIDATE_PAGE: &str = r#"
SELECT
    u.id, u.username, u.gender, u.age, u.city_id, u.bio, u.rating,
    c.latitude, c.longitude
FROM users u
INNER JOIN cities c ON u.city_id = c.id
INNER JOIN user_preferences up ON up.user_id = ?1
INNER JOIN users me ON me.id = ?1
INNER JOIN cities mc ON me.city_id = mc.id
LEFT JOIN blocks b1 ON b1.blocker_id = ?1 AND b1.blocked_id = u.id
LEFT JOIN blocks b2 ON b2.blocker_id = u.id AND b2.blocked_id = ?1
WHERE u.id != ?1
  AND u.is_active = 1
  AND b1.id IS NULL
  AND b2.id IS NULL
  AND u.age >= up.min_age
  AND u.age <= up.max_age
  AND (up.gender_preference = 'a' OR u.gender = up.gender_preference)
  AND 12742.0 * asin(sqrt(
        sin(radians(c.latitude - mc.latitude) / 2.0)
          * sin(radians(c.latitude - mc.latitude) / 2.0)
        + cos(radians(mc.latitude)) * cos(radians(c.latitude))
          * sin(radians(c.longitude - mc.longitude) / 2.0)
          * sin(radians(c.longitude - mc.longitude) / 2.0)
      )) <= up.max_distance_km
ORDER BY u.rating DESC, u.id ASC
LIMIT ?2 OFFSET ?3
"#;

// Admirers: everyone holding a live like pointed at the requester, minus
// anyone the requester has already liked back (those resolve through the
// match path instead of being re-offered). Preference filters do not apply
// here; block and active rules still do.
pub const SQL_ADMIRER_PAGE: &str = r#"
SELECT
    u.id, u.username, u.gender, u.age, u.city_id, u.bio, u.rating,
    c.latitude, c.longitude
FROM likes l
INNER JOIN users u ON u.id = l.from_user_id
LEFT JOIN cities c ON u.city_id = c.id
LEFT JOIN blocks b1 ON b1.blocker_id = ?1 AND b1.blocked_id = u.id
LEFT JOIN blocks b2 ON b2.blocker_id = u.id AND b2.blocked_id = ?1
WHERE l.to_user_id = ?1
  AND l.expires_at > ?2
  AND u.id != ?1
  AND u.is_active = 1
  AND b1.id IS NULL
  AND b2.id IS NULL
  AND NOT EXISTS (
      SELECT 1
      FROM likes mine
      WHERE mine.from_user_id = ?1
        AND mine.to_user_id = u.id
        AND mine.expires_at > ?2
  )
ORDER BY u.rating DESC, u.id ASC
LIMIT ?3 OFFSET ?4
"#;

pub async fn load_candidate_page(
    pool: &SqlitePool,
    requesting_user_id: i64,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<CandidateProfile>> {
    sqlx::query_as::<_, CandidateProfile>(SQL_CANDIDATE_PAGE)
        .bind(requesting_user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn load_admirer_page(
    pool: &SqlitePool,
    requesting_user_id: i64,
    now: DateTime<Utc>,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<CandidateProfile>> {
    sqlx::query_as::<_, CandidateProfile>(SQL_ADMIRER_PAGE)
        .bind(requesting_user_id)
        .bind(now)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}
