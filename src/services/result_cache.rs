use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::models::CandidateProfile;
use crate::services::candidate_service::ResultKind;

pub const PAGE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PageKey {
    user_id: i64,
    kind: ResultKind,
    offset: i64,
}

struct PageEntry {
    stored_at: Instant,
    page: Vec<CandidateProfile>,
}

/// TTL-bounded cache of computed result pages, keyed by
/// (user, result kind, page offset).
///
/// A cached page is a point-in-time snapshot; staleness is bounded by the TTL
/// and shortened by targeted invalidation on the mutations that matter.
/// Empty pages are never stored, so an exhausted search is re-checked on the
/// next call instead of being remembered as empty.
pub struct ResultCache {
    ttl: Duration,
    pages: Mutex<HashMap<PageKey, PageEntry>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_ttl(PAGE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            pages: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached page on a hit within the TTL; otherwise runs
    /// `compute`, stores a non-empty result, and returns it.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        user_id: i64,
        kind: ResultKind,
        offset: i64,
        compute: F,
    ) -> Result<Vec<CandidateProfile>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<CandidateProfile>, E>>,
    {
        if let Some(page) = self.get(user_id, kind, offset) {
            return Ok(page);
        }
        let page = compute().await?;
        self.put(user_id, kind, offset, &page);
        Ok(page)
    }

    pub fn get(&self, user_id: i64, kind: ResultKind, offset: i64) -> Option<Vec<CandidateProfile>> {
        let key = PageKey {
            user_id,
            kind,
            offset,
        };
        let mut pages = self.pages.lock().expect("result cache lock poisoned");
        if let Some(entry) = pages.get(&key) {
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.page.clone());
            }
        }
        pages.remove(&key);
        None
    }

    pub fn put(&self, user_id: i64, kind: ResultKind, offset: i64, page: &[CandidateProfile]) {
        if page.is_empty() {
            return;
        }
        let key = PageKey {
            user_id,
            kind,
            offset,
        };
        let mut pages = self.pages.lock().expect("result cache lock poisoned");
        pages.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        pages.insert(
            key,
            PageEntry {
                stored_at: Instant::now(),
                page: page.to_vec(),
            },
        );
    }

    /// Drops every cached offset of one result kind for one user.
    pub fn invalidate(&self, user_id: i64, kind: ResultKind) {
        let mut pages = self.pages.lock().expect("result cache lock poisoned");
        pages.retain(|key, _| key.user_id != user_id || key.kind != kind);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.pages.lock().expect("result cache lock poisoned").len()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: i64) -> CandidateProfile {
        CandidateProfile {
            id,
            username: None,
            gender: "f".to_string(),
            age: 30,
            city_id: None,
            bio: None,
            rating: 0,
            latitude: None,
            longitude: None,
            distance_km: None,
        }
    }

    #[test]
    fn hit_returns_stored_page_verbatim() {
        let cache = ResultCache::new();
        cache.put(1, ResultKind::Candidates, 0, &[profile(7), profile(8)]);

        let page = cache.get(1, ResultKind::Candidates, 0).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, 7);
    }

    #[test]
    fn empty_pages_are_not_cached() {
        let cache = ResultCache::new();
        cache.put(1, ResultKind::Candidates, 0, &[]);
        assert!(cache.get(1, ResultKind::Candidates, 0).is_none());
    }

    #[test]
    fn expired_entries_miss() {
        let cache = ResultCache::with_ttl(Duration::ZERO);
        cache.put(1, ResultKind::Candidates, 0, &[profile(7)]);
        assert!(cache.get(1, ResultKind::Candidates, 0).is_none());
    }

    #[test]
    fn invalidate_is_scoped_to_user_and_kind() {
        let cache = ResultCache::new();
        cache.put(1, ResultKind::Candidates, 0, &[profile(7)]);
        cache.put(1, ResultKind::Admirers, 0, &[profile(8)]);
        cache.put(2, ResultKind::Candidates, 0, &[profile(9)]);

        cache.invalidate(1, ResultKind::Candidates);

        assert!(cache.get(1, ResultKind::Candidates, 0).is_none());
        assert!(cache.get(1, ResultKind::Admirers, 0).is_some());
        assert!(cache.get(2, ResultKind::Candidates, 0).is_some());
    }

    #[tokio::test]
    async fn get_or_compute_skips_compute_on_hit() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let cache = ResultCache::new();
        cache.put(1, ResultKind::Admirers, 10, &[profile(3)]);

        let called = AtomicBool::new(false);
        let page = cache
            .get_or_compute(1, ResultKind::Admirers, 10, || {
                called.store(true, Ordering::SeqCst);
                async { Ok::<_, ()>(vec![profile(99)]) }
            })
            .await
            .unwrap();
        assert_eq!(page[0].id, 3);
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn get_or_compute_stores_computed_page() {
        let cache = ResultCache::new();
        let page = cache
            .get_or_compute(5, ResultKind::Candidates, 0, || async {
                Ok::<_, ()>(vec![profile(42)])
            })
            .await
            .unwrap();
        assert_eq!(page[0].id, 42);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(5, ResultKind::Candidates, 0).is_some());
    }
}
