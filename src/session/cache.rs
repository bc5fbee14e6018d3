//! Time-bounded session cache
//!
//! The storefront's dashboard wrapper used to stash the session in ambient
//! local storage with no expiry, which made logout unreliable. This cache is
//! the explicit replacement: an object the gate owns, with a fixed TTL per
//! entry and an [`invalidate`](SessionCache::invalidate) call for logout.
//!
//! Only successful lookups are cached; failures always go back to the
//! Session Service.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::SessionState;

#[derive(Debug, Clone)]
struct CachedSession {
    state: SessionState,
    expires_at: DateTime<Utc>,
}

impl CachedSession {
    fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Credential-keyed cache of resolved sessions with a fixed time-to-live.
#[derive(Debug)]
pub struct SessionCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedSession>>,
}

impl SessionCache {
    /// Create a cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up an unexpired cached state for a credential.
    pub async fn get(&self, credential: &str) -> Option<SessionState> {
        let entries = self.entries.read().await;
        entries
            .get(credential)
            .filter(|cached| !cached.is_expired())
            .map(|cached| cached.state.clone())
    }

    /// Cache a freshly resolved state for a credential.
    ///
    /// Expired entries are swept on every insert, so dead credentials do not
    /// accumulate while the gate is running even if nothing ever calls
    /// [`purge_expired`](Self::purge_expired).
    pub async fn insert(&self, credential: &str, state: SessionState) {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let cached = CachedSession { state, expires_at };
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired());
        entries.insert(credential.to_string(), cached);
    }

    /// Drop the cached state for a credential. Call this on logout so a
    /// stale authenticated session cannot outlive the backend's.
    pub async fn invalidate(&self, credential: &str) {
        self.entries.write().await.remove(credential);
    }

    /// Sweep expired entries. The cache stays correct without calling this
    /// (expired entries are never returned, and inserts sweep as they go);
    /// it only matters for bounding memory across long idle stretches.
    pub async fn purge_expired(&self) {
        self.entries
            .write()
            .await
            .retain(|_, cached| !cached.is_expired());
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
