//! Cache Store Module
//!
//! Bounded map with lazy TTL expiry, LRU capacity eviction and a tag index
//! for scoped invalidation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::{CacheEntry, CacheKey, CacheStats, LruTracker};
use crate::error::CacheError;

// == Cache Store ==
/// In-memory entry storage. Not synchronized; `ResponseCache` wraps it in a
/// mutex.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key -> entry
    entries: HashMap<CacheKey, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Tag -> keys carrying that tag
    tag_index: HashMap<String, HashSet<CacheKey>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL in seconds for entries stored without one
    default_ttl: u64,
    /// Time source for stored_at / expiry checks
    clock: Arc<dyn Clock>,
    /// Bumped by every clear or tag sweep
    generation: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a store with the given item threshold and default TTL (seconds).
    pub fn new(max_entries: usize, default_ttl: u64) -> Self {
        Self::with_clock(max_entries, default_ttl, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(max_entries: usize, default_ttl: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            tag_index: HashMap::new(),
            stats: CacheStats::new(),
            max_entries,
            default_ttl,
            clock,
            generation: 0,
        }
    }

    // == Get ==
    /// Returns a clone of the value stored under `key` if it is still fresh.
    ///
    /// An expired entry is dropped on the spot and reported as a miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// When a new key arrives at capacity, expired entries are reclaimed
    /// first and then least recently used entries are evicted until there is
    /// room.
    ///
    /// # Arguments
    /// * `ttl` - TTL in seconds (uses the default TTL if None)
    /// * `tags` - invalidation tags for the entry
    pub fn set(
        &mut self,
        key: CacheKey,
        value: V,
        ttl: Option<u64>,
        tags: Vec<String>,
    ) -> Result<(), CacheError> {
        if self.max_entries == 0 {
            return Err(CacheError::CacheFull(
                "item threshold is zero, nothing can be stored".to_string(),
            ));
        }

        if self.entries.contains_key(&key) {
            // Overwrite: drop the old tag links, keep the slot
            self.remove_entry(&key);
        } else if self.entries.len() >= self.max_entries {
            self.make_room()?;
        }

        let now = self.clock.now_ms();
        let entry = CacheEntry::new(
            key.clone(),
            value,
            now,
            ttl.unwrap_or(self.default_ttl),
            tags,
        );

        for tag in &entry.tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);

        self.stats.record_set();
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    fn make_room(&mut self) -> Result<(), CacheError> {
        self.purge_expired();

        while self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(victim) => {
                    self.remove_entry(&victim);
                    self.stats.record_eviction();
                }
                None => {
                    return Err(CacheError::CacheFull(
                        "cache is full and eviction found no candidate".to_string(),
                    ))
                }
            }
        }
        Ok(())
    }

    // == Remove ==
    /// Removes a single entry. Returns whether it existed.
    pub fn remove(&mut self, key: &CacheKey) -> bool {
        let removed = self.remove_entry(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    fn remove_entry(&mut self, key: &CacheKey) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        for tag in &entry.tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
        Some(entry)
    }

    // == Clear ==
    /// Drops every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.tag_index.clear();
        self.stats.set_total_entries(0);
        self.generation += 1;
        count
    }

    // == Invalidate Tags ==
    /// Drops every entry carrying at least one of `tags`.
    pub fn invalidate_tags(&mut self, tags: &[String]) -> usize {
        let victims: HashSet<CacheKey> = tags
            .iter()
            .filter_map(|tag| self.tag_index.get(tag))
            .flat_map(|keys| keys.iter().cloned())
            .collect();

        let count = victims
            .iter()
            .filter(|key| self.remove_entry(key).is_some())
            .count();

        self.stats.set_total_entries(self.entries.len());
        self.generation += 1;
        count
    }

    /// Invalidation counter. A value computed from data read before the
    /// counter moved must not be stored.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Counts a computed result that was not stored.
    pub fn record_skip(&mut self) {
        self.stats.record_skip();
    }

    /// Counts an invalidation sweep.
    pub fn record_invalidation(&mut self) {
        self.stats.record_invalidation();
    }

    /// Number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;

    fn k(s: &str) -> CacheKey {
        CacheKey::from_raw(s)
    }

    fn store_with_clock(max: usize, ttl: u64) -> (CacheStore<String>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let store = CacheStore::with_clock(max, ttl, Arc::new(clock.clone()));
        (store, clock)
    }

    fn put(store: &mut CacheStore<String>, key: &str) {
        store
            .set(k(key), format!("value_{key}"), None, vec![])
            .unwrap();
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(100, 300);
        assert!(store.is_empty());
        assert_eq!(store.max_entries(), 100);
        assert_eq!(store.default_ttl(), 300);
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock(100, 300);
        put(&mut store, "key1");

        assert_eq!(store.get(&k("key1")), Some("value_key1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock(100, 300);
        assert_eq!(store.get(&k("missing")), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite() {
        let (mut store, _) = store_with_clock(100, 300);
        store.set(k("key1"), "v1".to_string(), None, vec![]).unwrap();
        store.set(k("key1"), "v2".to_string(), None, vec![]).unwrap();

        assert_eq!(store.get(&k("key1")), Some("v2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_overwrite_resets_ttl() {
        let (mut store, clock) = store_with_clock(100, 10);
        put(&mut store, "key1");
        clock.advance_secs(8);
        put(&mut store, "key1");
        clock.advance_secs(8);

        assert!(store.get(&k("key1")).is_some());
    }

    #[test]
    fn test_store_ttl_expiration_is_lazy() {
        let (mut store, clock) = store_with_clock(100, 300);
        store
            .set(k("key1"), "v".to_string(), Some(2), vec![])
            .unwrap();

        clock.advance_ms(1_999);
        assert!(store.get(&k("key1")).is_some());

        clock.advance_ms(1);
        // Still physically present until someone looks
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&k("key1")), None);
        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_lru_eviction() {
        let (mut store, _) = store_with_clock(3, 300);
        put(&mut store, "key1");
        put(&mut store, "key2");
        put(&mut store, "key3");
        put(&mut store, "key4");

        assert_eq!(store.len(), 3);
        assert!(!store.contains(&k("key1")));
        assert!(store.contains(&k("key4")));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let (mut store, _) = store_with_clock(3, 300);
        put(&mut store, "key1");
        put(&mut store, "key2");
        put(&mut store, "key3");

        store.get(&k("key1")).unwrap();
        put(&mut store, "key4");

        assert!(store.contains(&k("key1")));
        assert!(!store.contains(&k("key2")));
    }

    #[test]
    fn test_threshold_two_without_reads_evicts_first_insert() {
        // TTL 2s, threshold 2: A and B at t=0, C at t=1
        let (mut store, clock) = store_with_clock(2, 2);
        put(&mut store, "A");
        put(&mut store, "B");
        clock.advance_secs(1);
        put(&mut store, "C");

        assert_eq!(store.len(), 2);
        assert!(!store.contains(&k("A")));
        assert!(store.contains(&k("B")));
        assert!(store.contains(&k("C")));
    }

    #[test]
    fn test_threshold_two_with_read_evicts_least_recent() {
        // Same as above, but A is read at t=0.5 so B becomes the victim
        let (mut store, clock) = store_with_clock(2, 2);
        put(&mut store, "A");
        put(&mut store, "B");
        clock.advance_ms(500);
        assert!(store.get(&k("A")).is_some());
        clock.advance_ms(500);
        put(&mut store, "C");

        assert_eq!(store.len(), 2);
        assert!(store.contains(&k("A")));
        assert!(!store.contains(&k("B")));
        assert!(store.contains(&k("C")));
    }

    #[test]
    fn test_expired_entries_reclaimed_before_eviction() {
        let (mut store, clock) = store_with_clock(2, 300);
        store.set(k("short"), "s".to_string(), Some(1), vec![]).unwrap();
        put(&mut store, "long");
        // Make "long" the LRU candidate
        store.get(&k("short"));
        clock.advance_secs(2);

        put(&mut store, "new");

        assert!(store.contains(&k("long")));
        assert!(store.contains(&k("new")));
        assert!(!store.contains(&k("short")));
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_zero_threshold_refuses_inserts() {
        let (mut store, _) = store_with_clock(0, 300);
        let result = store.set(k("a"), "v".to_string(), None, vec![]);
        assert!(matches!(result, Err(CacheError::CacheFull(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let (mut store, _) = store_with_clock(10, 300);
        put(&mut store, "a");
        put(&mut store, "b");

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.get(&k("a")), None);
    }

    #[test]
    fn test_generation_moves_on_every_sweep() {
        let (mut store, _) = store_with_clock(10, 300);
        assert_eq!(store.generation(), 0);

        put(&mut store, "a");
        assert_eq!(store.generation(), 0);

        store.clear();
        assert_eq!(store.generation(), 1);

        // A sweep that removes nothing still moves the counter
        store.invalidate_tags(&["vehicle:9".to_string()]);
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_invalidate_tags_only_hits_tagged_entries() {
        let (mut store, _) = store_with_clock(10, 300);
        store
            .set(k("detail_1"), "d1".to_string(), None, vec!["vehicle:1".to_string()])
            .unwrap();
        store
            .set(k("detail_2"), "d2".to_string(), None, vec!["vehicle:2".to_string()])
            .unwrap();
        store
            .set(k("list"), "l".to_string(), None, vec!["vehicles:list".to_string()])
            .unwrap();

        let removed = store.invalidate_tags(&["vehicle:1".to_string(), "vehicles:list".to_string()]);

        assert_eq!(removed, 2);
        assert!(store.contains(&k("detail_2")));
        assert!(!store.contains(&k("detail_1")));
        assert!(!store.contains(&k("list")));
    }

    #[test]
    fn test_overwrite_replaces_tags() {
        let (mut store, _) = store_with_clock(10, 300);
        store
            .set(k("a"), "v1".to_string(), None, vec!["old".to_string()])
            .unwrap();
        store
            .set(k("a"), "v2".to_string(), None, vec!["new".to_string()])
            .unwrap();

        assert_eq!(store.invalidate_tags(&["old".to_string()]), 0);
        assert_eq!(store.invalidate_tags(&["new".to_string()]), 1);
    }

    #[test]
    fn test_purge_expired() {
        let (mut store, clock) = store_with_clock(10, 300);
        store.set(k("a"), "v".to_string(), Some(1), vec![]).unwrap();
        store.set(k("b"), "v".to_string(), Some(10), vec![]).unwrap();
        clock.advance_secs(2);

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.contains(&k("b")));
    }

    #[test]
    fn test_store_stats() {
        let (mut store, _) = store_with_clock(10, 300);
        put(&mut store, "a");
        store.get(&k("a"));
        store.get(&k("missing"));
        store.record_skip();
        store.record_invalidation();

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.invalidations, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
