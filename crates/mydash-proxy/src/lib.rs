//! Proxy plumbing shared by the weather and news endpoints.
//!
//! Provides the in-memory response cache, the timeout-bounded upstream HTTP
//! client, and the cache-aside orchestration that ties them together.

pub mod cache;
pub mod cached;
pub mod clock;
pub mod upstream;

pub use cache::{is_fresh, CacheEntry, CacheStore, MemoryCache};
pub use cached::{CacheStatus, CachedResource, Fetched};
pub use clock::{Clock, ManualClock, SystemClock};
pub use upstream::UpstreamClient;
