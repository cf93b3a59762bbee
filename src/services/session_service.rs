use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::OwnedMutexGuard;

use crate::services::candidate_service::ResultKind;

pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// What the user is currently doing with the matchmaking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Idle,
    Browsing,
    ReviewingAdmirers,
}

/// Per-user interaction state: mode plus one independent cursor per result
/// kind. A cursor is the index of the last shown item, not the next one.
#[derive(Debug)]
pub struct SessionState {
    pub mode: SessionMode,
    candidate_cursor: i64,
    admirer_cursor: i64,
    touched_at: Instant,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: SessionMode::Idle,
            candidate_cursor: 0,
            admirer_cursor: 0,
            touched_at: Instant::now(),
        }
    }
}

impl SessionState {
    pub fn cursor(&self, kind: ResultKind) -> i64 {
        match kind {
            ResultKind::Candidates => self.candidate_cursor,
            ResultKind::Admirers => self.admirer_cursor,
        }
    }

    pub fn set_cursor(&mut self, kind: ResultKind, value: i64) {
        match kind {
            ResultKind::Candidates => self.candidate_cursor = value,
            ResultKind::Admirers => self.admirer_cursor = value,
        }
        self.touch();
    }

    pub fn reset_cursor(&mut self, kind: ResultKind) {
        self.set_cursor(kind, 0);
    }

    pub fn set_mode(&mut self, mode: SessionMode) {
        self.mode = mode;
        self.touch();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // Sliding expiry: every mutation refreshes the window.
    fn touch(&mut self) {
        self.touched_at = Instant::now();
    }

    fn expired(&self, ttl: Duration) -> bool {
        self.touched_at.elapsed() >= ttl
    }
}

/// Keyed store of session slots, one async mutex per user.
///
/// Locking a slot serializes all interactions of a single user while leaving
/// other users untouched; holding the guard across an entire controller
/// sequence is the intended use. State is created lazily and replaced with
/// the default once its inactivity window has passed.
pub struct SessionStore {
    ttl: Duration,
    slots: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<SessionState>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Acquires the user's slot for a multi-step interaction.
    pub async fn lock(&self, user_id: i64) -> OwnedMutexGuard<SessionState> {
        let slot = {
            let mut slots = self.slots.lock().expect("session store lock poisoned");
            slots.entry(user_id).or_default().clone()
        };
        let mut state = slot.lock_owned().await;
        if state.expired(self.ttl) {
            state.reset();
        }
        state
    }

    pub async fn mode(&self, user_id: i64) -> SessionMode {
        self.lock(user_id).await.mode
    }

    pub async fn set_mode(&self, user_id: i64, mode: SessionMode) {
        self.lock(user_id).await.set_mode(mode);
    }

    pub async fn cursor(&self, user_id: i64, kind: ResultKind) -> i64 {
        self.lock(user_id).await.cursor(kind)
    }

    pub async fn set_cursor(&self, user_id: i64, kind: ResultKind, value: i64) {
        self.lock(user_id).await.set_cursor(kind, value);
    }

    pub async fn reset_cursor(&self, user_id: i64, kind: ResultKind) {
        self.lock(user_id).await.reset_cursor(kind);
    }

    pub async fn reset(&self, user_id: i64) {
        self.lock(user_id).await.reset();
    }

    /// Drops slots whose state has expired and is not currently held.
    pub fn prune_expired(&self) {
        let mut slots = self.slots.lock().expect("session store lock poisoned");
        let ttl = self.ttl;
        slots.retain(|_, slot| match slot.try_lock() {
            Ok(state) => !state.expired(ttl),
            Err(_) => true,
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cursors_are_independent_per_kind() {
        let store = SessionStore::new();
        store.set_cursor(1, ResultKind::Candidates, 17).await;
        store.set_cursor(1, ResultKind::Admirers, 3).await;

        assert_eq!(store.cursor(1, ResultKind::Candidates).await, 17);
        assert_eq!(store.cursor(1, ResultKind::Admirers).await, 3);

        store.reset_cursor(1, ResultKind::Candidates).await;
        assert_eq!(store.cursor(1, ResultKind::Candidates).await, 0);
        assert_eq!(store.cursor(1, ResultKind::Admirers).await, 3);
    }

    #[tokio::test]
    async fn state_is_per_user() {
        let store = SessionStore::new();
        store.set_mode(1, SessionMode::Browsing).await;
        assert_eq!(store.mode(1).await, SessionMode::Browsing);
        assert_eq!(store.mode(2).await, SessionMode::Idle);
    }

    #[tokio::test]
    async fn expired_state_resets_to_default() {
        let store = SessionStore::with_ttl(Duration::ZERO);
        store.set_cursor(1, ResultKind::Candidates, 99).await;
        store.set_mode(1, SessionMode::Browsing).await;

        assert_eq!(store.cursor(1, ResultKind::Candidates).await, 0);
        assert_eq!(store.mode(1).await, SessionMode::Idle);
    }

    #[tokio::test]
    async fn prune_drops_expired_slots() {
        let store = SessionStore::with_ttl(Duration::ZERO);
        store.set_cursor(1, ResultKind::Candidates, 1).await;
        store.set_cursor(2, ResultKind::Candidates, 2).await;

        store.prune_expired();
        let slots = store.slots.lock().expect("session store lock poisoned");
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn full_reset_clears_mode_and_cursors() {
        let store = SessionStore::new();
        store.set_mode(1, SessionMode::ReviewingAdmirers).await;
        store.set_cursor(1, ResultKind::Admirers, 12).await;

        store.reset(1).await;
        assert_eq!(store.mode(1).await, SessionMode::Idle);
        assert_eq!(store.cursor(1, ResultKind::Admirers).await, 0);
    }
}
