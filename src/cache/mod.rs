//! Cache Module
//!
//! Cache-aside response caching with TTL expiration, LRU eviction and
//! write-triggered invalidation.

mod clock;
mod entry;
mod headers;
mod keys;
mod lru;
mod manager;
mod payload;
mod profile;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use headers::{apply_cache_headers, expires_at, http_date, CachedJson};
pub use keys::{derive_key, normalize_query, CacheKey, KeyArgs};
pub use lru::LruTracker;
pub use manager::{
    CacheSettings, CacheStatus, InvalidationPolicy, InvalidationReport, ResponseCache, CACHE_TYPE,
};
pub use payload::{CachedResponse, Cacheable};
pub use profile::{
    vehicle_tag, write_tags, CacheProfile, TtlPolicy, TAG_CATEGORIES, TAG_LIST, TAG_SEARCH,
};
pub use stats::CacheStats;
pub use store::CacheStore;
