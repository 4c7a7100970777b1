//! Request Routing
//!
//! Classifies every intercepted request and applies exactly one retrieval
//! policy: cache-first for static assets, network-first for document
//! navigations, stale-while-revalidate for everything else.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheRegistry, CachedResponse};
use crate::error::{CacheError, Result};
use crate::fetch::{Destination, FetchRequest, Fetcher};
use crate::worker::ServiceWorker;

// == Strategy ==
/// Retrieval policy chosen for one intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Serve from store if present, else fetch and populate the static store
    CacheFirst,
    /// Fetch first, fall back to store on network failure
    NetworkFirst,
    /// Serve store immediately while refreshing in the background
    StaleWhileRevalidate,
}

// == Classification ==
/// Picks the policy for a request.
///
/// Checked in order: manifest membership or a `.css`/`.js` marker anywhere
/// in the URL string wins over the document check, so a navigation to a URL
/// containing `.js` is still served cache-first.
pub fn classify(request: &FetchRequest, manifest_urls: &HashSet<String>) -> Strategy {
    let url = request.url.as_str();
    if manifest_urls.contains(url) || url.contains(".css") || url.contains(".js") {
        Strategy::CacheFirst
    } else if request.destination == Destination::Document {
        Strategy::NetworkFirst
    } else {
        Strategy::StaleWhileRevalidate
    }
}

// == Store Write ==
/// Writes a copy of `response` into the named store, subject to the scheme
/// guard.
///
/// Non-http(s) requests are skipped silently toward the caller; the skip is
/// observable through the scheme-skip counter and a debug log line. The
/// response handed back to the caller is never the stored copy.
async fn store_copy(
    registry: Arc<RwLock<CacheRegistry>>,
    store_name: String,
    request: FetchRequest,
    response: CachedResponse,
) {
    let mut registry = registry.write().await;
    if request.has_cacheable_scheme() {
        registry.put(&store_name, request.url.as_str(), response);
    } else {
        registry.stats_mut().record_scheme_skip();
        debug!(url = %request.url, "Store write skipped: non-cacheable scheme");
    }
}

impl ServiceWorker {
    // == Fetch Interception ==
    /// Handles one intercepted request.
    ///
    /// Refused until the worker is active. Concurrent requests are
    /// independent; two requests racing on the same URL may both write the
    /// same store entry, last write wins.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<CachedResponse> {
        self.ensure_active().await?;

        let strategy = classify(request, &self.manifest_urls);
        debug!(url = %request.url, ?strategy, "Routing intercepted request");

        match strategy {
            Strategy::CacheFirst => self.cache_first(request).await,
            Strategy::NetworkFirst => self.network_first(request).await,
            Strategy::StaleWhileRevalidate => self.stale_while_revalidate(request).await,
        }
    }

    /// Store order probed by the unified lookup: static first, then dynamic.
    fn probe_order(&self) -> [&str; 2] {
        [&self.static_store_name, &self.dynamic_store_name]
    }

    async fn lookup(&self, url: &str) -> Option<CachedResponse> {
        self.registry.write().await.lookup_any(&self.probe_order(), url)
    }

    async fn fetch_network(&self, request: &FetchRequest) -> std::result::Result<CachedResponse, crate::fetch::FetchError> {
        self.registry.write().await.stats_mut().record_network_fetch();
        self.fetcher.fetch(request).await
    }

    // == Cache-First ==
    /// Unified lookup, then network on miss; successful fetches populate
    /// the static store. A network failure with nothing cached propagates.
    async fn cache_first(&self, request: &FetchRequest) -> Result<CachedResponse> {
        if let Some(found) = self.lookup(request.url.as_str()).await {
            debug!(url = %request.url, "Cache-first hit");
            return Ok(found);
        }

        let response = self
            .fetch_network(request)
            .await
            .map_err(|e| CacheError::Upstream(e.to_string()))?;

        store_copy(
            self.registry(),
            self.static_store_name.clone(),
            request.clone(),
            response.clone(),
        )
        .await;
        Ok(response)
    }

    // == Network-First ==
    /// Network first; on success the dynamic store is refreshed, on failure
    /// the unified lookup provides the offline fallback.
    async fn network_first(&self, request: &FetchRequest) -> Result<CachedResponse> {
        match self.fetch_network(request).await {
            Ok(response) => {
                store_copy(
                    self.registry(),
                    self.dynamic_store_name.clone(),
                    request.clone(),
                    response.clone(),
                )
                .await;
                Ok(response)
            }
            Err(err) => {
                warn!(url = %request.url, error = %err, "Network-first fetch failed, probing stores");
                self.lookup(request.url.as_str())
                    .await
                    .ok_or_else(|| CacheError::Upstream(err.to_string()))
            }
        }
    }

    // == Stale-While-Revalidate ==
    /// Unified lookup plus a concurrent network refresh of the dynamic
    /// store. A cached entry is returned immediately, with the refresh left
    /// running detached; on a miss the caller waits on the network result.
    async fn stale_while_revalidate(&self, request: &FetchRequest) -> Result<CachedResponse> {
        let cached = self.lookup(request.url.as_str()).await;

        let registry = self.registry();
        let fetcher = Arc::clone(&self.fetcher);
        let store_name = self.dynamic_store_name.clone();
        let request = request.clone();
        let revalidate = async move {
            let outcome = {
                registry.write().await.stats_mut().record_network_fetch();
                fetcher.fetch(&request).await
            };
            match outcome {
                Ok(response) => {
                    store_copy(registry, store_name, request, response.clone()).await;
                    Ok(response)
                }
                Err(err) => {
                    debug!(url = %request.url, error = %err, "Revalidation fetch failed");
                    Err(CacheError::Upstream(err.to_string()))
                }
            }
        };

        match cached {
            Some(found) => {
                // Caller gets the stale copy now; the refresh is
                // fire-and-forget relative to this response.
                tokio::spawn(revalidate);
                Ok(found)
            }
            None => revalidate.await,
        }
    }
}
