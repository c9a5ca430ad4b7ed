//! Admin Handlers
//!
//! Catalog writes and admin reads. None of these are cached; every
//! successful write sweeps the response cache afterwards.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::api::state::AppState;
use crate::auth::AdminClaims;
use crate::catalog::{DashboardStats, Vehicle, VehicleDraft, SEARCH_LIMIT};
use crate::error::Result;
use crate::models::{
    AdminListQuery, AdminSearchResponse, AdminVehiclesResponse, CacheClearResponse,
    CacheStatsResponse, SearchQuery, VehicleWriteResponse,
};

/// Sweeps the cache once a write to `vehicle` is committed.
fn after_write(state: &AppState, action: &str, vehicle: &Vehicle) {
    state.cache.invalidate_after_write(Some(vehicle.id));
    info!(vehicle_id = vehicle.id, action, "vehicle write committed");
}

/// Handler for GET /api/admin/vehicles
pub async fn admin_list_vehicles(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<AdminVehiclesResponse>> {
    let page = state.catalog.admin_list(query.status(), query.page()).await?;
    Ok(Json(AdminVehiclesResponse {
        vehicles: page.items,
        pagination: page.pagination,
    }))
}

/// Handler for GET /api/admin/vehicles/search
///
/// Searches inactive vehicles too. A blank term yields an empty list.
pub async fn admin_search_vehicles(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Query(query): Query<SearchQuery>,
) -> Result<Json<AdminSearchResponse>> {
    let vehicles = match query.term() {
        Some(term) => state.catalog.admin_search(&term, SEARCH_LIMIT).await?,
        None => Vec::new(),
    };
    Ok(Json(AdminSearchResponse { vehicles }))
}

/// Handler for GET /api/admin/dashboard/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
    _admin: AdminClaims,
) -> Result<Json<DashboardStats>> {
    Ok(Json(state.catalog.dashboard_stats().await?))
}

/// Handler for POST /api/vehicles
pub async fn create_vehicle(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Json(draft): Json<VehicleDraft>,
) -> Result<(StatusCode, Json<VehicleWriteResponse>)> {
    let vehicle = state.catalog.create(draft).await?;
    after_write(&state, "create", &vehicle);
    Ok((
        StatusCode::CREATED,
        Json(VehicleWriteResponse::new("vehicle created", Some(vehicle))),
    ))
}

/// Handler for PUT /api/vehicles/:id
pub async fn update_vehicle(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Path(id): Path<u64>,
    Json(draft): Json<VehicleDraft>,
) -> Result<Json<VehicleWriteResponse>> {
    let vehicle = state.catalog.update(id, draft).await?;
    after_write(&state, "update", &vehicle);
    Ok(Json(VehicleWriteResponse::new("vehicle updated", Some(vehicle))))
}

/// Handler for DELETE /api/vehicles/:id (soft delete)
pub async fn delete_vehicle(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Path(id): Path<u64>,
) -> Result<Json<VehicleWriteResponse>> {
    let vehicle = state.catalog.soft_delete(id).await?;
    after_write(&state, "delete", &vehicle);
    Ok(Json(VehicleWriteResponse::new("vehicle deleted", None)))
}

/// Handler for PUT /api/admin/vehicles/:id/restore
pub async fn restore_vehicle(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Path(id): Path<u64>,
) -> Result<Json<VehicleWriteResponse>> {
    let vehicle = state.catalog.restore(id).await?;
    after_write(&state, "restore", &vehicle);
    Ok(Json(VehicleWriteResponse::new("vehicle restored", Some(vehicle))))
}

/// Handler for POST /api/admin/cache/clear
pub async fn clear_cache(
    State(state): State<AppState>,
    AdminClaims(claims): AdminClaims,
) -> Result<Json<CacheClearResponse>> {
    let removed = state.cache.clear()?;
    info!(user_id = claims.user_id, removed, "cache cleared by admin");
    Ok(Json(CacheClearResponse {
        message: "cache cleared".to_string(),
        removed,
    }))
}

/// Handler for GET /api/admin/cache/stats
pub async fn cache_stats(
    State(state): State<AppState>,
    _admin: AdminClaims,
) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse::from(state.cache.status()))
}
