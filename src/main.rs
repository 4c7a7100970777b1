//! Velocache - Offline-first caching proxy for the Cyclistic analytics dashboard
//!
//! Runs the worker lifecycle (install, activate) and then serves as the
//! interception surface for every request the dashboard page issues.

mod api;
mod cache;
mod config;
mod error;
mod fetch;
mod models;
mod worker;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::Url;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::CacheRegistry;
use config::{Config, Manifest};
use fetch::HttpFetcher;
use worker::ServiceWorker;

/// Main entry point for the caching proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration and the static asset manifest
/// 3. Build the upstream fetcher and the store registry
/// 4. Run the install phase (populate the static store, atomically)
/// 5. Run the activate phase (reclaim prior versions' stores)
/// 6. Serve the interception surface until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "velocache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Velocache offline caching proxy");

    let config = Config::from_env();
    info!(
        "Configuration loaded: version={}, upstream={}, port={}, fetch_timeout={:?}",
        config.cache_version, config.upstream_origin, config.server_port, config.fetch_timeout_secs
    );

    let manifest = match &config.manifest_path {
        Some(path) => Manifest::load(path)?,
        None => Manifest::default(),
    };
    let assets = manifest
        .resolve(&config.upstream_origin)
        .context("Failed to resolve the static asset manifest")?;
    info!("Manifest resolved: {} static assets", assets.len());

    let fetcher = HttpFetcher::new(config.fetch_timeout_secs.map(Duration::from_secs))
        .context("Failed to build the upstream HTTP client")?;

    let registry = Arc::new(RwLock::new(CacheRegistry::new()));
    let worker = Arc::new(ServiceWorker::new(
        config.static_store_name(),
        config.dynamic_store_name(),
        assets,
        registry,
        Arc::new(fetcher),
    ));

    worker
        .install()
        .await
        .context("Install phase failed; static store not populated")?;
    worker
        .activate()
        .await
        .context("Activate phase failed; stale stores not reclaimed")?;

    let origin = Url::parse(&config.upstream_origin).context("Invalid upstream origin")?;
    let app = create_router(AppState::new(worker, origin));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Proxy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Proxy shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
