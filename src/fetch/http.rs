//! HTTP Fetcher
//!
//! Production [`Fetcher`] backed by a shared reqwest client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::cache::CachedResponse;
use crate::fetch::{FetchError, FetchRequest, Fetcher};

// == HTTP Fetcher ==
/// Fetches upstream resources over HTTP(S).
///
/// Clone is cheap: `reqwest::Client` is reference-counted and shares its
/// connection pool across clones.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher, optionally bounded by a per-request timeout.
    ///
    /// With `timeout` unset a hung upstream leaves the request pending
    /// indefinitely, matching the no-deadline behavior of the deployed
    /// dashboard.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Setup(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, FetchError> {
        debug!(url = %request.url, "Fetching from upstream");

        let transport = |e: reqwest::Error| FetchError::Transport {
            url: request.url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(request.url.clone())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(transport)?;

        Ok(CachedResponse::new(status, headers, body))
    }
}
