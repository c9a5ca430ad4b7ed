//! LRU Tracker Module
//!
//! Recency index used to pick eviction victims.

use std::collections::{BTreeMap, HashMap};

use crate::cache::keys::CacheKey;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Every touch stamps the key with a fresh sequence number. The smallest
/// stamp in `order` is the least recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Sequence number -> key, ascending = oldest first
    order: BTreeMap<u64, CacheKey>,
    /// Key -> its current sequence number
    stamps: HashMap<CacheKey, u64>,
    /// Next sequence number to hand out
    next: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if unknown.
    pub fn touch(&mut self, key: &CacheKey) {
        if let Some(old) = self.stamps.insert(key.clone(), self.next) {
            self.order.remove(&old);
        }
        self.order.insert(self.next, key.clone());
        self.next += 1;
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &CacheKey) {
        if let Some(stamp) = self.stamps.remove(key) {
            self.order.remove(&stamp);
        }
    }

    // == Evict Oldest ==
    /// Returns and forgets the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<CacheKey> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&CacheKey> {
        self.order.values().next()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
        self.stamps.clear();
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.stamps.contains_key(key)
    }
}
