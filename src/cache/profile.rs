//! Cache profiles for the catalog's read queries.
//!
//! A profile decides the key prefix, the default TTL and the invalidation
//! tags of a cached read.

use serde::Serialize;

use crate::cache::keys::{derive_key, CacheKey, KeyArgs};

/// Tag carried by every list page.
pub const TAG_LIST: &str = "vehicles:list";
/// Tag carried by every search result.
pub const TAG_SEARCH: &str = "vehicles:search";
/// Tag carried by the per-category counts.
pub const TAG_CATEGORIES: &str = "vehicles:categories";

/// Tag scoping entries to a single vehicle.
pub fn vehicle_tag(id: u64) -> String {
    format!("vehicle:{id}")
}

/// Default TTLs in seconds, one per profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TtlPolicy {
    pub list: u64,
    pub detail: u64,
    pub search: u64,
    pub categories: u64,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            list: 3600,
            detail: 7200,
            search: 1800,
            categories: 7200,
        }
    }
}

/// Kind of read query being cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheProfile {
    /// Filtered, sorted, paginated vehicle listing
    List,
    /// Single vehicle by id
    Detail(u64),
    /// Free-text search results
    Search,
    /// Vehicle counts grouped by category
    Categories,
}

impl CacheProfile {
    /// Derives the full cache key for this profile.
    pub fn key(&self, path: &str, query: Option<&str>, args: &KeyArgs) -> CacheKey {
        let digest = derive_key(path, query, args);
        let raw = match self {
            CacheProfile::List => format!("vehicles_list_{digest}"),
            CacheProfile::Detail(id) => format!("vehicle_detail_{id}_{digest}"),
            CacheProfile::Search => format!("vehicles_search_{digest}"),
            CacheProfile::Categories => format!("vehicles_categories_{digest}"),
        };
        CacheKey::from_raw(raw)
    }

    /// Returns this profile's TTL under `policy`.
    pub fn ttl(&self, policy: &TtlPolicy) -> u64 {
        match self {
            CacheProfile::List => policy.list,
            CacheProfile::Detail(_) => policy.detail,
            CacheProfile::Search => policy.search,
            CacheProfile::Categories => policy.categories,
        }
    }

    /// Invalidation tags an entry of this profile is indexed under.
    pub fn tags(&self) -> Vec<String> {
        match self {
            CacheProfile::List => vec![TAG_LIST.to_string()],
            CacheProfile::Detail(id) => vec![vehicle_tag(*id)],
            CacheProfile::Search => vec![TAG_SEARCH.to_string()],
            CacheProfile::Categories => vec![TAG_CATEGORIES.to_string()],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CacheProfile::List => "list",
            CacheProfile::Detail(_) => "detail",
            CacheProfile::Search => "search",
            CacheProfile::Categories => "categories",
        }
    }
}

/// Tags to drop after a write touching `vehicle_id` (or any vehicle).
///
/// Lists, searches and category counts can include any vehicle, so they are
/// always part of the set.
pub fn write_tags(vehicle_id: Option<u64>) -> Vec<String> {
    let mut tags = vec![
        TAG_LIST.to_string(),
        TAG_SEARCH.to_string(),
        TAG_CATEGORIES.to_string(),
    ];
    if let Some(id) = vehicle_id {
        tags.push(vehicle_tag(id));
    }
    tags
}
