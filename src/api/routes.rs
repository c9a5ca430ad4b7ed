//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::admin::{
    admin_list_vehicles, admin_search_vehicles, cache_stats, clear_cache, create_vehicle,
    dashboard_stats, delete_vehicle, restore_vehicle, update_vehicle,
};
use super::handlers::{
    fallback_handler, get_vehicle, health_handler, list_vehicles, search_vehicles,
    vehicle_categories,
};
use super::session::{login, logout, refresh, verify};
use super::state::AppState;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/vehicles` - Cached listing (POST creates, admin)
/// - `GET /api/vehicles/search?q=` - Cached search
/// - `GET /api/vehicles/categories` - Cached category counts
/// - `GET /api/vehicles/:id` - Cached detail (PUT/DELETE, admin)
/// - `POST /api/auth/login`, `GET /api/auth/verify`, `POST /api/auth/refresh`,
///   `POST /api/auth/logout`
/// - `GET /api/admin/vehicles` - Uncached admin listing
/// - `GET /api/admin/vehicles/search?q=` - Uncached search including inactive
/// - `GET /api/admin/dashboard/stats` - Live totals and groupings
/// - `PUT /api/admin/vehicles/:id/restore` - Undo a soft delete
/// - `POST /api/admin/cache/clear`, `GET /api/admin/cache/stats`
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/api/vehicles/search", get(search_vehicles))
        .route("/api/vehicles/categories", get(vehicle_categories))
        .route(
            "/api/vehicles/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify", get(verify))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
        .route("/api/admin/vehicles", get(admin_list_vehicles))
        .route("/api/admin/vehicles/search", get(admin_search_vehicles))
        .route("/api/admin/dashboard/stats", get(dashboard_stats))
        .route("/api/admin/vehicles/:id/restore", put(restore_vehicle))
        .route("/api/admin/cache/clear", post(clear_cache))
        .route("/api/admin/cache/stats", get(cache_stats))
        .route("/health", get(health_handler))
        .fallback(fallback_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
