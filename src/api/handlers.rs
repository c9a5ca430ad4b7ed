//! API Handlers
//!
//! Public read handlers. Each one goes through the response cache and is
//! served with `Cache-Control`/`Expires` for its profile TTL.

use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::payload::CatalogPayload;
use crate::api::state::AppState;
use crate::cache::{CacheProfile, CachedJson, KeyArgs};
use crate::catalog::SEARCH_LIMIT;
use crate::error::{AppError, Result};
use crate::models::{HealthResponse, SearchQuery, VehicleListQuery};

/// Runs `profile`'s read through the cache and renders it.
async fn serve_cached<F, Fut>(
    state: &AppState,
    profile: CacheProfile,
    uri: &Uri,
    args: KeyArgs,
    compute: F,
) -> Result<CachedJson>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<CatalogPayload>>,
{
    let ttl = state.cache.ttl_for(profile);
    let payload = state
        .cache
        .cached(profile, uri.path(), uri.query(), &args, compute)
        .await?;
    Ok(CachedJson::new(payload.into_body(ttl), ttl))
}

/// Handler for GET /api/vehicles
///
/// Filtered, sorted and paginated listing of active vehicles.
pub async fn list_vehicles(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<VehicleListQuery>,
) -> Result<CachedJson> {
    let catalog = state.catalog.clone();
    serve_cached(&state, CacheProfile::List, &uri, KeyArgs::new(), || async move {
        let page = catalog
            .list(&query.filters(), query.sort(), query.page())
            .await?;
        Ok::<_, AppError>(CatalogPayload::Page(page))
    })
    .await
}

/// Handler for GET /api/vehicles/:id
pub async fn get_vehicle(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<u64>,
) -> Result<CachedJson> {
    let catalog = state.catalog.clone();
    let args = KeyArgs::new().arg(id);
    serve_cached(&state, CacheProfile::Detail(id), &uri, args, || async move {
        let vehicle = catalog.get(id).await?;
        Ok::<_, AppError>(CatalogPayload::Vehicle(Box::new(vehicle)))
    })
    .await
}

/// Handler for GET /api/vehicles/search?q=
///
/// A blank term answers `{"vehicles": []}` without touching the cache.
pub async fn search_vehicles(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let Some(term) = query.term() else {
        return Ok(Json(json!({ "vehicles": [] })).into_response());
    };

    let catalog = state.catalog.clone();
    let served = serve_cached(&state, CacheProfile::Search, &uri, KeyArgs::new(), || async move {
        let vehicles = catalog.search(&term, SEARCH_LIMIT).await?;
        Ok::<_, AppError>(CatalogPayload::Search { term, vehicles })
    })
    .await?;
    Ok(served.into_response())
}

/// Handler for GET /api/vehicles/categories
pub async fn vehicle_categories(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<CachedJson> {
    let catalog = state.catalog.clone();
    serve_cached(&state, CacheProfile::Categories, &uri, KeyArgs::new(), || async move {
        let categories = catalog.category_counts().await?;
        Ok::<_, AppError>(CatalogPayload::Categories(categories))
    })
    .await
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// JSON 404 for unmatched routes.
pub async fn fallback_handler(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
