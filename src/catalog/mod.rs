//! Catalog Module
//!
//! Vehicle records, listing queries and the storage boundary the HTTP layer
//! reads from and writes to.

mod memory;
mod model;
mod query;
mod store;

pub use memory::InMemoryCatalog;
pub use model::{
    CategoryCount, DashboardStats, Vehicle, VehicleDraft, CATEGORIES, FUELS, TRANSMISSIONS,
    UNCATEGORIZED,
};
pub use query::{
    AdminStatus, Page, PageRequest, Pagination, SortField, SortOrder, SortSpec, VehicleFilters,
    SEARCH_LIMIT,
};
pub use store::{CatalogError, CatalogStore};
