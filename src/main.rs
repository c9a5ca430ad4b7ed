//! Vehicle Catalog - dealership REST backend with a cache-aside response cache

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vehicle_catalog::api::warm_listing;
use vehicle_catalog::catalog::{InMemoryCatalog, VehicleDraft};
use vehicle_catalog::{create_router, AppState, Config};

/// Main entry point for the catalog server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load the catalog (optionally seeded from a JSON file)
/// 4. Build the response cache and warm the default listing
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vehicle_catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vehicle Catalog Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_enabled={}, max_entries={}, default_ttl={}s, invalidation={}, port={}",
        config.cache_enabled,
        config.max_entries,
        config.default_ttl,
        config.invalidation,
        config.server_port
    );

    let catalog = load_catalog(config.catalog_seed.as_deref()).await?;
    let state = AppState::from_config(&config, Arc::new(catalog));

    if config.cache_enabled && config.cache_warm {
        // Failure here only costs the first request a miss
        if let Err(err) = warm_listing(&state).await {
            warn!(error = %err, "cache warm-up failed");
        }
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the catalog, preloading drafts from `seed` when given.
async fn load_catalog(seed: Option<&str>) -> anyhow::Result<InMemoryCatalog> {
    let Some(path) = seed else {
        return Ok(InMemoryCatalog::new());
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read catalog seed {path}"))?;
    let drafts: Vec<VehicleDraft> =
        serde_json::from_str(&raw).with_context(|| format!("invalid catalog seed {path}"))?;
    let count = drafts.len();
    let catalog = InMemoryCatalog::from_drafts(drafts)
        .with_context(|| format!("catalog seed {path} failed validation"))?;

    info!(vehicles = count, path, "catalog seeded");
    Ok(catalog)
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
