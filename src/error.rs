//! Error taxonomy for the matchmaking core.
//!
//! Store failures are wrapped, never retried here (the single retry in the
//! match-cleanup path lives in the match service). Nothing in this crate
//! panics on a request path.

/// Errors surfaced by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requester has not finished onboarding: no preference row, or no
    /// usable city. A distinguishable condition, not a system fault.
    #[error("onboarding incomplete for user {user_id}: missing {missing}")]
    NotReady { user_id: i64, missing: &'static str },

    /// A transient storage failure (timeout, connection loss, constraint
    /// machinery other than the duplicate-like case).
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Page offsets must be aligned to the page size of the result kind.
    #[error("offset {offset} is not a multiple of page size {page_size}")]
    InvalidOffset { offset: i64, page_size: i64 },

    /// Rejected caller input (preference bounds and the like).
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}
