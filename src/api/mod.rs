//! API Module
//!
//! HTTP handlers and routing for the vehicle catalog REST API.

pub mod admin;
pub mod handlers;
pub mod payload;
pub mod routes;
pub mod session;
pub mod state;
pub mod warm;

pub use payload::CatalogPayload;
pub use routes::create_router;
pub use state::AppState;
pub use warm::{warm_listing, LISTING_PATH};
