//! In-memory response cache.
//!
//! One store per resource type. Entries are replaced on refresh and never
//! evicted; the key spaces are small (24 news buckets, one weather key per
//! rounded coordinate pair). Freshness is decided by the caller.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;

/// A cached value and the moment it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at_millis: i64,
}

impl<V> CacheEntry<V> {
    /// Milliseconds elapsed since the entry was stored.
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.stored_at_millis)
    }
}

/// `true` while the entry is younger than `ttl`.
pub fn is_fresh<V>(entry: &CacheEntry<V>, ttl: Duration, now_millis: i64) -> bool {
    let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    entry.age_millis(now_millis) < ttl_millis
}

pub trait CacheStore<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheEntry<V>>;

    /// Store `value` stamped with the current time, replacing any prior entry.
    fn set(&self, key: &str, value: V);
}

/// `CacheStore` backed by a `HashMap` behind a read-write lock.
///
/// Each `get`/`set` is its own short critical section; concurrent writers for
/// the same key resolve last-writer-wins.
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V> MemoryCache<V> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<V> std::fmt::Debug for MemoryCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl<V> CacheStore<V> for MemoryCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<CacheEntry<V>> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: V) {
        let entry = CacheEntry {
            value,
            stored_at_millis: self.clock.now_millis(),
        };
        self.entries.write().insert(key.to_string(), entry);
    }
}
