use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::books::record::BookRecord;
use crate::helpers::time::{expires_at, get_instant};

/// What a lookup stores: one record for ISBN lookups, an ordered list for searches.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedLookup {
    Volume(BookRecord),
    Volumes(Vec<BookRecord>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedLookup,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Key/value store with per-entry expiry used by the lookup service.
pub trait BookCache: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Option<CachedLookup>> + Send;

    fn set(&self, key: &str, value: CachedLookup, ttl: Duration) -> impl Future<Output = ()> + Send;
}

/// In-process cache: key -> (normalized lookup, expiry).
///
/// Expiry is lazy, an entry past its deadline is dropped by the next `get`.
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookCache {
    inner: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryBookCache {
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Number of stored entries, expired ones included until they are read.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl BookCache for MemoryBookCache {
    async fn get(&self, key: &str) -> Option<CachedLookup> {
        let now = get_instant();
        {
            let map = self.inner.read().await;
            match map.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut map = self.inner.write().await;
        // another task may have refreshed the entry between the two locks
        if map.get(key).is_some_and(|entry| entry.is_expired(now)) {
            debug!(key, "cache entry expired");
            map.remove(key);
        }
        map.get(key).map(|entry| entry.value.clone())
    }

    async fn set(&self, key: &str, value: CachedLookup, ttl: Duration) {
        let Some(expires_at) = expires_at(ttl) else {
            warn!(key, ttl_secs = ttl.as_secs(), "cache ttl out of range, entry not stored");
            return;
        };
        let entry = CacheEntry { value, expires_at };
        self.inner.write().await.insert(key.to_owned(), entry);
    }
}
