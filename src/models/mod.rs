//! Request and Response models for the catalog API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{AdminListQuery, LoginRequest, SearchQuery, VehicleListQuery};
pub use responses::{
    AdminSearchResponse, AdminVehiclesResponse, CacheClearResponse, CacheStatsResponse,
    HealthResponse, LoginResponse, RefreshResponse, UserInfo, VehicleWriteResponse,
    VerifyResponse,
};
