//! Startup cache warming.

use tracing::info;

use crate::api::payload::CatalogPayload;
use crate::api::state::AppState;
use crate::cache::{CacheProfile, KeyArgs};
use crate::error::Result;
use crate::models::VehicleListQuery;

/// Path of the default public listing.
pub const LISTING_PATH: &str = "/api/vehicles";

/// Stores the default listing page (`GET /api/vehicles` with no query) so
/// the first visitor is served from the cache.
///
/// Returns whether anything was stored; an empty catalog stores nothing.
pub async fn warm_listing(state: &AppState) -> Result<bool> {
    let query = VehicleListQuery::default();
    let page = state
        .catalog
        .list(&query.filters(), query.sort(), query.page())
        .await?;
    let count = page.items.len();

    let stored = state.cache.warm(
        CacheProfile::List,
        LISTING_PATH,
        None,
        &KeyArgs::new(),
        CatalogPayload::Page(page),
    )?;
    info!(vehicles = count, stored, "listing cache warmed");
    Ok(stored)
}
