//! Response DTOs for the catalog API
//!
//! Defines the structure of outgoing HTTP response bodies that are not
//! served from the response cache.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::Claims;
use crate::cache::CacheStatus;
use crate::catalog::{Pagination, Vehicle};

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Confirmation of a write, with the vehicle as stored when there is one.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleWriteResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,
}

impl VehicleWriteResponse {
    pub fn new(message: impl Into<String>, vehicle: Option<Vehicle>) -> Self {
        Self {
            message: message.into(),
            vehicle,
        }
    }
}

/// Admin listing (never cached).
#[derive(Debug, Clone, Serialize)]
pub struct AdminVehiclesResponse {
    pub vehicles: Vec<Vehicle>,
    pub pagination: Pagination,
}

/// Admin search over every vehicle (never cached).
#[derive(Debug, Clone, Serialize)]
pub struct AdminSearchResponse {
    pub vehicles: Vec<Vehicle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: u64,
    pub email: String,
    pub role: String,
}

impl From<&Claims> for UserInfo {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.email.clone(),
            role: claims.role.clone(),
        }
    }
}

/// Response body for POST /api/auth/login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserInfo,
}

/// Response body for POST /api/auth/refresh
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Response body for GET /api/auth/verify
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: UserInfo,
    pub expires_at: DateTime<Utc>,
}

/// Response body for POST /api/admin/cache/clear
#[derive(Debug, Clone, Serialize)]
pub struct CacheClearResponse {
    pub message: String,
    pub removed: usize,
}

/// Response body for GET /api/admin/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    #[serde(flatten)]
    pub status: CacheStatus,
    /// hits / (hits + misses), absent when the store is unusable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_rate: Option<f64>,
}

impl From<CacheStatus> for CacheStatsResponse {
    fn from(status: CacheStatus) -> Self {
        let hit_rate = status.stats.as_ref().map(|stats| stats.hit_rate());
        Self { status, hit_rate }
    }
}
