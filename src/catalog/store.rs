//! Catalog storage boundary.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::model::{CategoryCount, DashboardStats, Vehicle, VehicleDraft};
use crate::catalog::query::{AdminStatus, Page, PageRequest, SortSpec, VehicleFilters};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("vehicle {0} not found")]
    NotFound(u64),

    #[error("invalid vehicle: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("catalog backend failure: {0}")]
    Backend(String),
}

/// Persistent vehicle storage.
///
/// Public reads (`list`, `get`, `search`, `category_counts`) only see active
/// vehicles. Writes return the vehicle as stored once the change is durable.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list(
        &self,
        filters: &VehicleFilters,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<Page<Vehicle>, CatalogError>;

    /// Active vehicle by id.
    async fn get(&self, id: u64) -> Result<Vehicle, CatalogError>;

    /// Active vehicles matching `term` in any text field, at most `limit`.
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<Vehicle>, CatalogError>;

    /// Active vehicle counts per category.
    async fn category_counts(&self) -> Result<Vec<CategoryCount>, CatalogError>;

    /// Every vehicle regardless of activity, newest first.
    async fn admin_list(
        &self,
        status: AdminStatus,
        page: PageRequest,
    ) -> Result<Page<Vehicle>, CatalogError>;

    /// Like [`search`](Self::search) but over inactive vehicles too.
    async fn admin_search(&self, term: &str, limit: usize) -> Result<Vec<Vehicle>, CatalogError>;

    /// Active and inactive totals plus per-category, brand and fuel counts.
    async fn dashboard_stats(&self) -> Result<DashboardStats, CatalogError>;

    async fn create(&self, draft: VehicleDraft) -> Result<Vehicle, CatalogError>;

    /// Replaces an existing vehicle, active or not.
    async fn update(&self, id: u64, draft: VehicleDraft) -> Result<Vehicle, CatalogError>;

    /// Marks a vehicle inactive.
    async fn soft_delete(&self, id: u64) -> Result<Vehicle, CatalogError>;

    /// Marks a vehicle active again.
    async fn restore(&self, id: u64) -> Result<Vehicle, CatalogError>;
}
