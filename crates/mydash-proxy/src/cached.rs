//! Cache-aside orchestration: lookup, fetch on miss, store on success.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use mydash_core::ProxyError;

use crate::cache::{is_fresh, CacheStore, MemoryCache};
use crate::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fetched<V> {
    pub value: V,
    pub status: CacheStatus,
}

/// A cache store, the clock that judges its freshness, and a TTL.
pub struct CachedResource<V> {
    name: &'static str,
    cache: Arc<dyn CacheStore<V>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<V> Clone for CachedResource<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            cache: self.cache.clone(),
            clock: self.clock.clone(),
            ttl: self.ttl,
        }
    }
}

impl<V> CachedResource<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Resource backed by a fresh `MemoryCache`.
    pub fn in_memory(name: &'static str, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        let cache = Arc::new(MemoryCache::new(clock.clone()));
        Self::new(name, cache, clock, ttl)
    }

    pub fn new(
        name: &'static str,
        cache: Arc<dyn CacheStore<V>>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            name,
            cache,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current time according to this resource's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Return the fresh cached value for `key`, or run `fetch` and cache its
    /// result.
    ///
    /// A failed fetch leaves the cache untouched; a stale entry is never
    /// served in its place.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Fetched<V>, ProxyError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ProxyError>>,
    {
        let now = self.clock.now_millis();

        if let Some(entry) = self.cache.get(key) {
            if is_fresh(&entry, self.ttl, now) {
                tracing::debug!(
                    resource = self.name,
                    key,
                    age_ms = entry.age_millis(now),
                    "Cache hit"
                );
                return Ok(Fetched {
                    value: entry.value,
                    status: CacheStatus::Hit,
                });
            }
            tracing::debug!(resource = self.name, key, "Cache entry expired");
        }

        let started = Instant::now();
        match fetch().await {
            Ok(value) => {
                self.cache.set(key, value.clone());
                tracing::info!(
                    resource = self.name,
                    key,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Fetched from upstream and cached"
                );
                Ok(Fetched {
                    value,
                    status: CacheStatus::Miss,
                })
            }
            Err(e) => {
                tracing::debug!(
                    resource = self.name,
                    key,
                    kind = e.kind(),
                    status = e.status_code(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Upstream fetch failed: {}",
                    e
                );
                Err(e)
            }
        }
    }
}
