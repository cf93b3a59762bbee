use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::CoreError;
use crate::models::CandidateProfile;
use crate::services::candidate_service::{self, ResultKind};
use crate::services::match_service::{self, LikeOutcome};
use crate::services::notify_service::Notifier;
use crate::services::result_cache::ResultCache;
use crate::services::session_service::{SessionMode, SessionState, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDecision {
    Like,
    Dislike,
}

#[derive(Debug)]
pub struct SwipeResult {
    /// `None` for dislikes, which record nothing durable on the candidate
    /// path and withdraw the admirer's like on the admirer path.
    pub like: Option<LikeOutcome>,
    pub next: Option<CandidateProfile>,
}

/// Serves the profile at the user's current candidate cursor, entering
/// browsing mode. `None` means the result set is exhausted: the cursor has
/// been reset, the cached pages dropped, and the session returned to idle.
pub async fn browse_next(
    pool: &SqlitePool,
    cache: &ResultCache,
    sessions: &SessionStore,
    user_id: i64,
) -> Result<Option<CandidateProfile>, CoreError> {
    let mut session = sessions.lock(user_id).await;
    session.set_mode(SessionMode::Browsing);
    let cursor = session.cursor(ResultKind::Candidates);
    serve_at(pool, cache, &mut session, user_id, ResultKind::Candidates, cursor).await
}

/// Records the swipe on the current candidate, then advances the cursor and
/// serves the next profile. Durable effects land before the cursor moves.
pub async fn swipe(
    pool: &SqlitePool,
    cache: &ResultCache,
    sessions: &SessionStore,
    notifier: &dyn Notifier,
    user_id: i64,
    target_id: i64,
    decision: SwipeDecision,
    message: Option<&str>,
) -> Result<SwipeResult, CoreError> {
    let mut session = sessions.lock(user_id).await;

    let like = match decision {
        SwipeDecision::Like => Some(
            match_service::record_like(pool, cache, notifier, user_id, target_id, message).await?,
        ),
        SwipeDecision::Dislike => {
            info!("User {} passed on candidate {}", user_id, target_id);
            None
        }
    };

    let cursor = session.cursor(ResultKind::Candidates) + 1;
    session.set_cursor(ResultKind::Candidates, cursor);
    let next = serve_at(pool, cache, &mut session, user_id, ResultKind::Candidates, cursor).await?;
    Ok(SwipeResult { like, next })
}

/// Serves the admirer at the user's current admirer cursor.
pub async fn browse_next_admirer(
    pool: &SqlitePool,
    cache: &ResultCache,
    sessions: &SessionStore,
    user_id: i64,
) -> Result<Option<CandidateProfile>, CoreError> {
    let mut session = sessions.lock(user_id).await;
    session.set_mode(SessionMode::ReviewingAdmirers);
    let cursor = session.cursor(ResultKind::Admirers);
    serve_at(pool, cache, &mut session, user_id, ResultKind::Admirers, cursor).await
}

/// Resolves the decision on an admirer: a like back consumes the pair into a
/// match, a dislike withdraws the admirer's edge. Then advances and serves
/// the next admirer.
pub async fn swipe_admirer(
    pool: &SqlitePool,
    cache: &ResultCache,
    sessions: &SessionStore,
    notifier: &dyn Notifier,
    user_id: i64,
    target_id: i64,
    decision: SwipeDecision,
) -> Result<SwipeResult, CoreError> {
    let mut session = sessions.lock(user_id).await;

    let like = match decision {
        SwipeDecision::Like => Some(
            match_service::record_like(pool, cache, notifier, user_id, target_id, None).await?,
        ),
        SwipeDecision::Dislike => {
            match_service::withdraw_like(pool, cache, target_id, user_id).await?;
            None
        }
    };

    let cursor = session.cursor(ResultKind::Admirers) + 1;
    session.set_cursor(ResultKind::Admirers, cursor);
    let next = serve_at(pool, cache, &mut session, user_id, ResultKind::Admirers, cursor).await?;
    Ok(SwipeResult { like, next })
}

/// A preference change makes every cached candidate page wrong for its
/// owner: drop them, rewind the candidate cursor, leave browsing.
pub async fn invalidate_on_preference_change(
    cache: &ResultCache,
    sessions: &SessionStore,
    user_id: i64,
) {
    let mut session = sessions.lock(user_id).await;
    session.reset_cursor(ResultKind::Candidates);
    session.set_mode(SessionMode::Idle);
    cache.invalidate(user_id, ResultKind::Candidates);
}

// The cursor names the item to serve; its page is loaded through the cache.
// When the cursor points past the loaded page, the following page is tried
// once: empty means the result set is exhausted, which rewinds the cursor,
// drops the kind's cached pages, and ends the browsing mode.
async fn serve_at(
    pool: &SqlitePool,
    cache: &ResultCache,
    session: &mut SessionState,
    user_id: i64,
    kind: ResultKind,
    cursor: i64,
) -> Result<Option<CandidateProfile>, CoreError> {
    let page_size = kind.page_size();
    let offset = (cursor / page_size) * page_size;
    let index = (cursor % page_size) as usize;

    let page = load_page(pool, cache, user_id, kind, offset).await?;
    if let Some(profile) = page.get(index) {
        return Ok(Some(profile.clone()));
    }

    let next = if page.is_empty() {
        Vec::new()
    } else {
        load_page(pool, cache, user_id, kind, offset + page_size).await?
    };

    if next.is_empty() {
        session.reset_cursor(kind);
        session.set_mode(SessionMode::Idle);
        cache.invalidate(user_id, kind);
        return Ok(None);
    }

    session.set_cursor(kind, offset + page_size);
    Ok(next.first().cloned())
}

async fn load_page(
    pool: &SqlitePool,
    cache: &ResultCache,
    user_id: i64,
    kind: ResultKind,
    offset: i64,
) -> Result<Vec<CandidateProfile>, CoreError> {
    cache
        .get_or_compute(user_id, kind, offset, || async move {
            match kind {
                ResultKind::Candidates => {
                    candidate_service::fetch_candidate_page(pool, user_id, offset).await
                }
                ResultKind::Admirers => {
                    candidate_service::fetch_admirer_page(pool, user_id, offset).await
                }
            }
        })
        .await
}
