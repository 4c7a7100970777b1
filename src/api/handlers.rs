//! API Handlers
//!
//! The interception handler every page request funnels through, plus the
//! admin endpoints.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    response::Response,
    Json,
};
use reqwest::Url;

use crate::error::{CacheError, Result};
use crate::fetch::{Destination, FetchRequest};
use crate::models::{HealthResponse, StatsResponse, StoreSummary};
use crate::worker::ServiceWorker;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The caching layer
    pub worker: Arc<ServiceWorker>,
    /// Origin intercepted paths resolve against
    pub origin: Url,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(worker: Arc<ServiceWorker>, origin: Url) -> Self {
        Self { worker, origin }
    }
}

/// Fallback handler for every intercepted page request.
///
/// Rebuilds the absolute upstream URL from the request path, reads the
/// resource kind from `Sec-Fetch-Dest`, and hands the request to the
/// worker's routing policies. Only GET requests are intercepted.
pub async fn intercept_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response> {
    if request.method() != Method::GET {
        return Err(CacheError::InvalidRequest(format!(
            "only GET requests are intercepted, got {}",
            request.method()
        )));
    }

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = state
        .origin
        .join(path_and_query)
        .map_err(|e| CacheError::InvalidRequest(format!("unroutable path {}: {}", path_and_query, e)))?;

    let destination = Destination::from_header(
        request
            .headers()
            .get("sec-fetch-dest")
            .and_then(|v| v.to_str().ok()),
    );

    let fetch_request = FetchRequest::new(url, destination);
    let cached = state.worker.handle_fetch(&fetch_request).await?;
    into_http_response(cached)
}

/// Handler for GET /_cache/stats
///
/// Returns routing counters and per-store entry counts.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let registry = state.worker.registry();
    let registry = registry.read().await;

    let mut stores: Vec<StoreSummary> = registry
        .store_names()
        .into_iter()
        .map(|name| {
            let entries = registry.get(&name).map(|s| s.len()).unwrap_or(0);
            StoreSummary { name, entries }
        })
        .collect();
    stores.sort_by(|a, b| a.name.cmp(&b.name));

    Json(StatsResponse::new(
        &registry.stats(),
        registry.total_entries(),
        stores,
    ))
}

/// Handler for GET /_cache/health
///
/// Reports healthy once the worker is active.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_state(state.worker.state().await))
}

/// Rebuilds an HTTP response from a cached or freshly fetched copy.
fn into_http_response(cached: crate::cache::CachedResponse) -> Result<Response> {
    let mut builder = axum::http::Response::builder().status(cached.status);
    for (name, value) in &cached.headers {
        builder = builder.header(name, value);
    }
    builder
        .body(Body::from(cached.body))
        .map_err(|e| CacheError::Internal(format!("response build failed: {}", e)))
}
