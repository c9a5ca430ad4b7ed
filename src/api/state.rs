//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::api::payload::CatalogPayload;
use crate::auth::{IdentityProvider, StaticIdentity, ADMIN_ROLE};
use crate::cache::ResponseCache;
use crate::catalog::CatalogStore;
use crate::config::Config;

/// Application state shared across all handlers.
///
/// Every field is a cheap handle; clones share the same cache, catalog and
/// sessions.
#[derive(Clone)]
pub struct AppState {
    /// Response cache for the public read routes
    pub cache: ResponseCache<CatalogPayload>,
    pub catalog: Arc<dyn CatalogStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        cache: ResponseCache<CatalogPayload>,
        catalog: Arc<dyn CatalogStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            cache,
            catalog,
            identity,
        }
    }

    /// Creates an AppState from configuration around an existing catalog.
    ///
    /// The configured admin account is the only identity.
    pub fn from_config(config: &Config, catalog: Arc<dyn CatalogStore>) -> Self {
        let identity = StaticIdentity::new(config.token_ttl_hours).with_account(
            &config.admin_email,
            &config.admin_password,
            ADMIN_ROLE,
        );
        Self::new(
            ResponseCache::from_config(config),
            catalog,
            Arc::new(identity),
        )
    }
}

impl FromRef<AppState> for Arc<dyn IdentityProvider> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.identity)
    }
}
