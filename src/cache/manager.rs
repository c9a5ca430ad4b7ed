//! Response cache manager.
//!
//! Cache-aside wrapper shared by every handler: look up, compute on miss,
//! store non-empty results, and sweep after writes. The store lock is only
//! held around map operations, never while a result is being computed.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::keys::{CacheKey, KeyArgs};
use crate::cache::payload::Cacheable;
use crate::cache::profile::{write_tags, CacheProfile, TtlPolicy};
use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::CacheError;

/// Name reported by the status endpoint.
pub const CACHE_TYPE: &str = "InMemoryLru";

/// What an invalidation sweep removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationPolicy {
    /// Every write clears the whole store
    ClearAll,
    /// A write drops only entries tagged with the touched vehicle and the
    /// list/search/category collections
    Tagged,
}

impl FromStr for InvalidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear_all" | "all" => Ok(InvalidationPolicy::ClearAll),
            "tagged" | "tags" => Ok(InvalidationPolicy::Tagged),
            other => Err(format!("unknown invalidation policy '{other}'")),
        }
    }
}

impl fmt::Display for InvalidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidationPolicy::ClearAll => f.write_str("clear_all"),
            InvalidationPolicy::Tagged => f.write_str("tagged"),
        }
    }
}

/// Construction parameters for [`ResponseCache`].
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    pub max_entries: usize,
    pub default_ttl: u64,
    pub ttls: TtlPolicy,
    pub policy: InvalidationPolicy,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 500,
            default_ttl: 3600,
            ttls: TtlPolicy::default(),
            policy: InvalidationPolicy::ClearAll,
        }
    }
}

impl From<&Config> for CacheSettings {
    fn from(config: &Config) -> Self {
        Self {
            enabled: config.cache_enabled,
            max_entries: config.max_entries,
            default_ttl: config.default_ttl,
            ttls: config.ttls,
            policy: config.invalidation,
        }
    }
}

/// Outcome of an invalidation sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationReport {
    pub policy: InvalidationPolicy,
    pub vehicle_id: Option<u64>,
    pub removed: usize,
}

/// Coarse cache status for the admin endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub cache_type: &'static str,
    /// "active", "disabled" or "error"
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub invalidation_policy: InvalidationPolicy,
    pub default_ttl: u64,
    pub max_entries: usize,
    pub ttls: TtlPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CacheStats>,
}

// == Response Cache ==
/// Process-wide cache handle. Clones share the same store.
#[derive(Debug)]
pub struct ResponseCache<V> {
    store: Arc<Mutex<CacheStore<V>>>,
    settings: Arc<CacheSettings>,
    /// Counted outside the store: when the lock is unusable so are its stats
    store_errors: Arc<AtomicU64>,
}

impl<V> Clone for ResponseCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: Arc::clone(&self.settings),
            store_errors: Arc::clone(&self.store_errors),
        }
    }
}

impl<V: Cacheable> ResponseCache<V> {
    pub fn new(settings: CacheSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Creates a cache whose entries age according to `clock`.
    pub fn with_clock(settings: CacheSettings, clock: Arc<dyn Clock>) -> Self {
        let store = CacheStore::with_clock(settings.max_entries, settings.default_ttl, clock);
        Self {
            store: Arc::new(Mutex::new(store)),
            settings: Arc::new(settings),
            store_errors: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheSettings::from(config))
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn policy(&self) -> InvalidationPolicy {
        self.settings.policy
    }

    /// TTL in seconds applied to reads of `profile`.
    pub fn ttl_for(&self, profile: CacheProfile) -> u64 {
        profile.ttl(&self.settings.ttls)
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheStore<V>>, CacheError> {
        self.store
            .lock()
            .map_err(|_| CacheError::StoreUnavailable("cache store lock poisoned".to_string()))
    }

    fn note_store_error(&self, err: &CacheError, key: &CacheKey) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
        warn!(key = %key, error = %err, "cache store unavailable, serving uncached");
    }

    // == Get Or Compute ==
    /// Returns the cached value for `key`, or runs `compute` and stores its
    /// result for `ttl` seconds under `tags`.
    ///
    /// * A compute error is returned unchanged and nothing is stored.
    /// * A result that is not [`Cacheable::is_cacheable`] is returned but not
    ///   stored.
    /// * If the store cannot be used the value is computed directly.
    /// * If an invalidation lands while `compute` runs, the result is
    ///   returned but not stored.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &CacheKey,
        ttl: u64,
        tags: Vec<String>,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !self.settings.enabled {
            return compute().await;
        }

        let cached = self
            .lock()
            .map(|mut store| (store.get(key), store.generation()));
        let generation = match cached {
            Ok((Some(value), _)) => {
                info!(key = %key, "cache HIT");
                return Ok(value);
            }
            Ok((None, generation)) => {
                info!(key = %key, "cache MISS");
                generation
            }
            Err(err) => {
                self.note_store_error(&err, key);
                return compute().await;
            }
        };

        let value = compute().await?;

        if !value.is_cacheable() {
            debug!(key = %key, "cache SKIP: empty result");
            if let Ok(mut store) = self.lock() {
                store.record_skip();
            }
            return Ok(value);
        }

        let stored = self.lock().and_then(|mut store| {
            // A sweep landed while computing: the value may predate the write
            if store.generation() != generation {
                store.record_skip();
                return Ok(false);
            }
            store
                .set(key.clone(), value.clone(), Some(ttl), tags)
                .map(|()| true)
        });
        match stored {
            Ok(true) => info!(key = %key, ttl, "cache SET"),
            Ok(false) => info!(key = %key, "cache SKIP: invalidated during compute"),
            Err(err) => self.note_store_error(&err, key),
        }

        Ok(value)
    }

    /// [`get_or_compute`](Self::get_or_compute) with key, TTL and tags taken
    /// from `profile`.
    pub async fn cached<F, Fut, E>(
        &self,
        profile: CacheProfile,
        path: &str,
        query: Option<&str>,
        args: &KeyArgs,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let key = profile.key(path, query, args);
        let ttl = self.ttl_for(profile);
        self.get_or_compute(&key, ttl, profile.tags(), compute)
            .await
    }

    // == Warm ==
    /// Pre-populates `profile`'s entry for the given request with `value`.
    ///
    /// Returns whether the value was stored (empty values are not).
    pub fn warm(
        &self,
        profile: CacheProfile,
        path: &str,
        query: Option<&str>,
        args: &KeyArgs,
        value: V,
    ) -> Result<bool, CacheError> {
        if !self.settings.enabled || !value.is_cacheable() {
            return Ok(false);
        }
        let key = profile.key(path, query, args);
        let ttl = self.ttl_for(profile);
        self.lock()?
            .set(key.clone(), value, Some(ttl), profile.tags())?;
        info!(key = %key, ttl, "cache warmed");
        Ok(true)
    }

    // == Invalidate ==
    /// Sweeps entries made stale by a write to `vehicle_id` (or to the
    /// catalog as a whole when `None`).
    ///
    /// Under [`InvalidationPolicy::ClearAll`] the scope is ignored and the
    /// store is emptied.
    pub fn invalidate(&self, vehicle_id: Option<u64>) -> Result<InvalidationReport, CacheError> {
        let policy = self.settings.policy;
        let mut store = self
            .lock()
            .map_err(|err| CacheError::Invalidation(err.to_string()))?;

        let removed = match policy {
            InvalidationPolicy::ClearAll => store.clear(),
            InvalidationPolicy::Tagged => store.invalidate_tags(&write_tags(vehicle_id)),
        };
        store.record_invalidation();

        Ok(InvalidationReport {
            policy,
            vehicle_id,
            removed,
        })
    }

    /// Runs [`invalidate`](Self::invalidate) after a committed write.
    ///
    /// Never fails: a broken sweep is logged and the write stands.
    pub fn invalidate_after_write(&self, vehicle_id: Option<u64>) {
        match self.invalidate(vehicle_id) {
            Ok(report) => info!(
                vehicle_id = ?vehicle_id,
                policy = %report.policy,
                removed = report.removed,
                "cache invalidated after write"
            ),
            Err(err) => {
                self.store_errors.fetch_add(1, Ordering::Relaxed);
                error!(vehicle_id = ?vehicle_id, error = %err, "cache invalidation failed, entries may be stale");
            }
        }
    }

    // == Clear ==
    /// Empties the store regardless of policy. Returns entries removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let mut store = self
            .lock()
            .map_err(|err| CacheError::Invalidation(err.to_string()))?;
        let removed = store.clear();
        store.record_invalidation();
        info!(removed, "cache cleared");
        Ok(removed)
    }

    // == Status ==
    pub fn status(&self) -> CacheStatus {
        let settings = &self.settings;
        let mut status = CacheStatus {
            cache_type: CACHE_TYPE,
            status: if settings.enabled { "active" } else { "disabled" },
            error: None,
            invalidation_policy: settings.policy,
            default_ttl: settings.default_ttl,
            max_entries: settings.max_entries,
            ttls: settings.ttls,
            stats: None,
        };

        match self.lock() {
            Ok(store) => {
                let mut stats = store.stats();
                stats.store_errors += self.store_errors.load(Ordering::Relaxed);
                status.stats = Some(stats);
            }
            Err(err) => {
                status.status = "error";
                status.error = Some(err.to_string());
            }
        }
        status
    }

    /// Number of stored entries (0 if the store is unusable).
    pub fn len(&self) -> usize {
        self.lock().map(|store| store.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
