use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::database::like_repo::{self, LikeInsert, NewLike};
use crate::database::{city_repo, user_repo};
use crate::error::CoreError;
use crate::models::UserRow;
use crate::services::candidate_service::ResultKind;
use crate::services::notify_service::Notifier;
use crate::services::result_cache::ResultCache;

/// A like decays after this retention window.
pub const LIKE_RETENTION_DAYS: i64 = 30;

/// Result of recording a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Created { matched: bool },
    Duplicate,
}

/// Records a directed like and resolves reciprocity.
///
/// A repeated (or concurrently raced) insert for the same pair surfaces as
/// `Duplicate` with no further effect. A fresh edge bumps the target's
/// rating; if the target already holds a live like back at the sender, the
/// pair is consumed into a match: both edges deleted, both ratings
/// recomputed, both admirer caches invalidated, both parties notified.
/// Durable mutations come first; notification failures never unwind a match.
pub async fn record_like(
    pool: &SqlitePool,
    cache: &ResultCache,
    notifier: &dyn Notifier,
    from_user_id: i64,
    to_user_id: i64,
    message: Option<&str>,
) -> Result<LikeOutcome, CoreError> {
    let now = Utc::now();
    let inserted = like_repo::insert_like(
        pool,
        NewLike {
            from_user_id,
            to_user_id,
            message,
            created_at: now,
            expires_at: now + chrono::Duration::days(LIKE_RETENTION_DAYS),
        },
    )
    .await?;

    if inserted == LikeInsert::Duplicate {
        info!(
            "User {} already liked user {}, ignoring repeat",
            from_user_id, to_user_id
        );
        return Ok(LikeOutcome::Duplicate);
    }

    // The edge is durable from here on; a rating failure is logged but does
    // not undo the like.
    if let Err(e) = user_repo::update_rating(pool, to_user_id, now).await {
        error!("Failed to update rating for user {}: {}", to_user_id, e);
    }
    cache.invalidate(to_user_id, ResultKind::Admirers);

    let reciprocal = match like_repo::find_live_like(pool, to_user_id, from_user_id, now).await {
        Ok(r) => r,
        Err(e) => {
            warn!(
                "Reciprocity check failed for {} -> {}: {}",
                to_user_id, from_user_id, e
            );
            None
        }
    };
    if reciprocal.is_none() {
        return Ok(LikeOutcome::Created { matched: false });
    }

    consume_match(pool, cache, notifier, from_user_id, to_user_id, now).await;
    Ok(LikeOutcome::Created { matched: true })
}

/// Deletes the `from -> to` edge (an admirer being declined, or a like taken
/// back), recomputes the formerly-liked user's rating, and invalidates their
/// admirer pages. Deleting an absent edge is a no-op.
pub async fn withdraw_like(
    pool: &SqlitePool,
    cache: &ResultCache,
    from_user_id: i64,
    to_user_id: i64,
) -> Result<(), CoreError> {
    let deleted = like_repo::delete_like(pool, from_user_id, to_user_id).await?;
    if deleted == 0 {
        return Ok(());
    }

    let now = Utc::now();
    if let Err(e) = user_repo::update_rating(pool, to_user_id, now).await {
        error!("Failed to update rating for user {}: {}", to_user_id, e);
    }
    cache.invalidate(to_user_id, ResultKind::Admirers);
    Ok(())
}

// Both directed edges are consumed, then ratings, then caches, then the
// notifications. Cleanup failures retry once per direction and are otherwise
// logged as anomalies: the match already happened, and an orphaned one-sided
// edge is preferable to unwinding it.
async fn consume_match(
    pool: &SqlitePool,
    cache: &ResultCache,
    notifier: &dyn Notifier,
    user_id: i64,
    other_id: i64,
    now: DateTime<Utc>,
) {
    delete_edge_with_retry(pool, other_id, user_id).await;
    delete_edge_with_retry(pool, user_id, other_id).await;

    for uid in [user_id, other_id] {
        if let Err(e) = user_repo::update_rating(pool, uid, now).await {
            error!("Failed to update rating for user {}: {}", uid, e);
        }
    }

    for uid in [user_id, other_id] {
        cache.invalidate(uid, ResultKind::Admirers);
    }

    notify_match(pool, notifier, user_id, other_id).await;
}

async fn delete_edge_with_retry(pool: &SqlitePool, from_user_id: i64, to_user_id: i64) {
    if let Err(first) = like_repo::delete_like(pool, from_user_id, to_user_id).await {
        warn!(
            "Retrying like cleanup {} -> {} after: {}",
            from_user_id, to_user_id, first
        );
        if let Err(e) = like_repo::delete_like(pool, from_user_id, to_user_id).await {
            error!(
                "Like cleanup {} -> {} failed twice, an orphaned edge may remain: {}",
                from_user_id, to_user_id, e
            );
        }
    }
}

async fn notify_match(pool: &SqlitePool, notifier: &dyn Notifier, user_id: i64, other_id: i64) {
    let (user, other) = match (
        user_repo::load_user(pool, user_id).await,
        user_repo::load_user(pool, other_id).await,
    ) {
        (Ok(Some(user)), Ok(Some(other))) => (user, other),
        (Err(e), _) | (_, Err(e)) => {
            error!(
                "Failed to load users {} and {} for match notification: {}",
                user_id, other_id, e
            );
            return;
        }
        _ => {
            warn!(
                "Match between {} and {} but a profile is gone, skipping notification",
                user_id, other_id
            );
            return;
        }
    };

    let other_city = load_city_name(pool, &other).await;
    notifier
        .notify(user_id, &match_message(&other, other_city.as_deref()))
        .await;

    let user_city = load_city_name(pool, &user).await;
    notifier
        .notify(other_id, &match_message(&user, user_city.as_deref()))
        .await;
}

async fn load_city_name(pool: &SqlitePool, user: &UserRow) -> Option<String> {
    let city_id = user.city_id?;
    match city_repo::load_city(pool, city_id).await {
        Ok(city) => city.map(|c| c.name),
        Err(e) => {
            error!("Failed to load city {} for user {}: {}", city_id, user.id, e);
            None
        }
    }
}

fn match_message(other: &UserRow, city_name: Option<&str>) -> String {
    let name = other.username.as_deref().unwrap_or("Someone");
    match city_name {
        Some(city) => format!(
            "It's a match! {} ({}, {}) liked you back.",
            name, other.age, city
        ),
        None => format!("It's a match! {} ({}) liked you back.", name, other.age),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: Option<&str>, age: i64) -> UserRow {
        UserRow {
            id: 1,
            username: username.map(str::to_string),
            gender: "f".to_string(),
            age,
            city_id: None,
            bio: None,
            is_active: true,
            rating: 0,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn match_message_mentions_name_age_and_city() {
        let msg = match_message(&user(Some("sam"), 29), Some("Utrecht"));
        assert_eq!(msg, "It's a match! sam (29, Utrecht) liked you back.");
    }

    #[test]
    fn match_message_without_profile_details_still_reads() {
        let msg = match_message(&user(None, 41), None);
        assert_eq!(msg, "It's a match! Someone (41) liked you back.");
    }
}
