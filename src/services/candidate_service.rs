use sqlx::SqlitePool;

use crate::database::{candidate_repo, city_repo, preference_repo, user_repo};
use crate::error::CoreError;
use crate::models::CandidateProfile;

pub const CANDIDATE_PAGE_SIZE: i64 = 50;
pub const ADMIRER_PAGE_SIZE: i64 = 10;

/// The two result sets a user can page through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Candidates,
    Admirers,
}

impl ResultKind {
    pub fn page_size(self) -> i64 {
        match self {
            ResultKind::Candidates => CANDIDATE_PAGE_SIZE,
            ResultKind::Admirers => ADMIRER_PAGE_SIZE,
        }
    }
}

/// Fetches one page of preference-eligible candidates for the requester.
///
/// The offset must be page-aligned; an offset past the end of the result set
/// yields an empty page rather than an error. A requester without a
/// preference row or a usable city is reported as `NotReady` so the caller
/// can treat it as incomplete onboarding.
pub async fn fetch_candidate_page(
    pool: &SqlitePool,
    requesting_user_id: i64,
    offset: i64,
) -> Result<Vec<CandidateProfile>, CoreError> {
    check_offset(offset, CANDIDATE_PAGE_SIZE)?;

    if preference_repo::load_preferences(pool, requesting_user_id)
        .await?
        .is_none()
    {
        return Err(CoreError::NotReady {
            user_id: requesting_user_id,
            missing: "preferences",
        });
    }

    let city_id = user_repo::load_user(pool, requesting_user_id)
        .await?
        .and_then(|u| u.city_id);
    let Some(city_id) = city_id else {
        return Err(CoreError::NotReady {
            user_id: requesting_user_id,
            missing: "city",
        });
    };
    let Some(own_city) = city_repo::load_city(pool, city_id).await? else {
        return Err(CoreError::NotReady {
            user_id: requesting_user_id,
            missing: "city",
        });
    };

    let mut page =
        candidate_repo::load_candidate_page(pool, requesting_user_id, CANDIDATE_PAGE_SIZE, offset)
            .await?;

    for profile in &mut page {
        if let (Some(lat), Some(lon)) = (profile.latitude, profile.longitude) {
            profile.distance_km =
                Some(haversine_km(own_city.latitude, own_city.longitude, lat, lon));
        }
    }

    Ok(page)
}

/// Fetches one page of admirers: users holding a live like directed at the
/// requester, minus anyone the requester has already liked back. Admirer
/// review applies no preference filters and needs no onboarding state.
pub async fn fetch_admirer_page(
    pool: &SqlitePool,
    requesting_user_id: i64,
    offset: i64,
) -> Result<Vec<CandidateProfile>, CoreError> {
    check_offset(offset, ADMIRER_PAGE_SIZE)?;

    let now = chrono::Utc::now();
    let page = candidate_repo::load_admirer_page(
        pool,
        requesting_user_id,
        now,
        ADMIRER_PAGE_SIZE,
        offset,
    )
    .await?;
    Ok(page)
}

fn check_offset(offset: i64, page_size: i64) -> Result<(), CoreError> {
    if offset < 0 || offset % page_size != 0 {
        return Err(CoreError::InvalidOffset { offset, page_size });
    }
    Ok(())
}

pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let to_rad = |deg: f64| deg.to_radians();
    let dlat = to_rad(lat2 - lat1);
    let dlon = to_rad(lon2 - lon1);
    let a = (dlat / 2.0).sin().powi(2)
        + to_rad(lat1).cos() * to_rad(lat2).cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    6371.0 * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_known_distance() {
        // Amsterdam <-> Rotterdam, roughly 57 km apart.
        let d = haversine_km(52.3676, 4.9041, 51.9244, 4.4777);
        assert!((d - 57.0).abs() < 3.0, "got {d}");
    }

    #[test]
    fn haversine_zero_for_same_point() {
        assert_eq!(haversine_km(48.0, 2.0, 48.0, 2.0), 0.0);
    }

    #[test]
    fn offset_must_be_page_aligned() {
        assert!(check_offset(0, CANDIDATE_PAGE_SIZE).is_ok());
        assert!(check_offset(100, CANDIDATE_PAGE_SIZE).is_ok());
        assert!(matches!(
            check_offset(30, CANDIDATE_PAGE_SIZE),
            Err(CoreError::InvalidOffset { .. })
        ));
        assert!(matches!(
            check_offset(-50, CANDIDATE_PAGE_SIZE),
            Err(CoreError::InvalidOffset { .. })
        ));
    }

    #[test]
    fn page_sizes_differ_per_kind() {
        assert_eq!(ResultKind::Candidates.page_size(), 50);
        assert_eq!(ResultKind::Admirers.page_size(), 10);
    }
}
