//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{InvalidationPolicy, TtlPolicy};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether read responses are cached at all
    pub cache_enabled: bool,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in seconds for entries stored without a profile TTL
    pub default_ttl: u64,
    /// Per-profile TTLs in seconds
    pub ttls: TtlPolicy,
    /// What a write sweeps from the cache
    pub invalidation: InvalidationPolicy,
    /// Pre-populate the default listing at startup
    pub cache_warm: bool,
    /// HTTP server port
    pub server_port: u16,
    pub admin_email: String,
    pub admin_password: String,
    /// Bearer token lifetime in hours
    pub token_ttl_hours: i64,
    /// Optional JSON file of vehicle drafts loaded at startup
    pub catalog_seed: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ENABLED` - Toggle the response cache (default: true)
    /// - `CACHE_THRESHOLD` - Maximum cache entries (default: 500)
    /// - `CACHE_TIMEOUT` - Default TTL in seconds (default: 3600)
    /// - `CACHE_LIST_TTL` / `CACHE_DETAIL_TTL` / `CACHE_SEARCH_TTL` /
    ///   `CACHE_CATEGORIES_TTL` - Profile TTLs (default: 3600/7200/1800/7200)
    /// - `CACHE_INVALIDATION` - `clear_all` or `tagged` (default: clear_all)
    /// - `CACHE_WARM` - Warm the listing cache at startup (default: true)
    /// - `SERVER_PORT` - HTTP server port (default: 5000)
    /// - `ADMIN_EMAIL` / `ADMIN_PASSWORD` - Admin account
    /// - `TOKEN_TTL_HOURS` - Bearer token lifetime (default: 24)
    /// - `CATALOG_SEED` - Path to a JSON array of vehicles to preload
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config reading each variable through `lookup`.
    ///
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |name: &str, fallback| parse_or(lookup(name), fallback);

        Self {
            cache_enabled: parse_flag(lookup("CACHE_ENABLED"), defaults.cache_enabled),
            max_entries: parse_or(lookup("CACHE_THRESHOLD"), defaults.max_entries),
            default_ttl: parsed("CACHE_TIMEOUT", defaults.default_ttl),
            ttls: TtlPolicy {
                list: parsed("CACHE_LIST_TTL", defaults.ttls.list),
                detail: parsed("CACHE_DETAIL_TTL", defaults.ttls.detail),
                search: parsed("CACHE_SEARCH_TTL", defaults.ttls.search),
                categories: parsed("CACHE_CATEGORIES_TTL", defaults.ttls.categories),
            },
            invalidation: parse_or(lookup("CACHE_INVALIDATION"), defaults.invalidation),
            cache_warm: parse_flag(lookup("CACHE_WARM"), defaults.cache_warm),
            server_port: parse_or(lookup("SERVER_PORT"), defaults.server_port),
            admin_email: lookup("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: lookup("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            token_ttl_hours: parse_or(lookup("TOKEN_TTL_HOURS"), defaults.token_ttl_hours),
            catalog_seed: lookup("CATALOG_SEED").filter(|path| !path.trim().is_empty()),
        }
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, fallback: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(fallback)
}

fn parse_flag(raw: Option<String>, fallback: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => fallback,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_entries: 500,
            default_ttl: 3600,
            ttls: TtlPolicy::default(),
            invalidation: InvalidationPolicy::ClearAll,
            cache_warm: true,
            server_port: 5000,
            admin_email: "admin@dealership.local".to_string(),
            admin_password: "change-me".to_string(),
            token_ttl_hours: 24,
            catalog_seed: None,
        }
    }
}
