//! Cache Statistics Module
//!
//! Coarse counters for the admin status endpoint. No per-key data.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to compute (absent or expired)
    pub misses: u64,
    /// Results stored after a miss
    pub sets: u64,
    /// Computed results not stored because they were empty
    pub skipped: u64,
    /// Entries dropped to stay under the item threshold
    pub evictions: u64,
    /// Entries dropped because their TTL had elapsed
    pub expirations: u64,
    /// Invalidation sweeps performed
    pub invalidations: u64,
    /// Times the store could not be used and the cache failed open
    pub store_errors: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_invalidation(&mut self) {
        self.invalidations += 1;
    }

    pub fn record_store_error(&mut self) {
        self.store_errors += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_counters() {
        let mut stats = CacheStats::new();
        stats.record_set();
        stats.record_skip();
        stats.record_eviction();
        stats.record_eviction();
        stats.record_expiration();
        stats.record_invalidation();
        stats.record_store_error();
        stats.set_total_entries(42);

        assert_eq!(stats.sets, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.evictions, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.invalidations, 1);
        assert_eq!(stats.store_errors, 1);
        assert_eq!(stats.total_entries, 42);
    }
}
