//! Vehicle Catalog - dealership REST backend with a cache-aside response cache
//!
//! Public reads are cached with per-profile TTLs and LRU eviction; admin
//! writes invalidate the cache once they are committed.

pub mod api;
pub mod auth;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;

pub use api::{create_router, AppState};
pub use config::Config;
