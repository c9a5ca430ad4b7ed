//! Cache Entry Module
//!
//! A stored result together with the metadata needed to age it out.

use std::collections::BTreeSet;

use crate::cache::keys::CacheKey;

// == Cache Entry ==
/// Represents a single cached result.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Fingerprint the entry was stored under
    pub key: CacheKey,
    /// The cached payload
    pub value: V,
    /// Insertion timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Time to live in milliseconds
    pub ttl_ms: u64,
    /// Invalidation tags the entry is indexed under
    pub tags: BTreeSet<String>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stored at `now_ms` that lives for `ttl_secs` seconds.
    pub fn new(
        key: CacheKey,
        value: V,
        now_ms: u64,
        ttl_secs: u64,
        tags: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            key,
            value,
            stored_at: now_ms,
            ttl_ms: ttl_secs.saturating_mul(1000),
            tags: tags.into_iter().collect(),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is past its TTL at `now_ms`.
    ///
    /// Boundary condition: the entry is expired once `now - stored_at >= ttl`,
    /// so a zero TTL is never readable.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at) >= self.ttl_ms
    }

    // == Time To Live ==
    /// Returns the remaining lifetime in milliseconds (0 once expired).
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.ttl_ms
            .saturating_sub(now_ms.saturating_sub(self.stored_at))
    }
}
