//! Configuration Module
//!
//! Handles proxy configuration from environment variables and the static
//! asset manifest consumed by the install phase.

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::Deserialize;

/// Prefix shared by every store name this deployment owns.
pub const CACHE_PREFIX: &str = "velocache";

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment version tag embedded in store names.
    ///
    /// Bumping this tag is the sole cache-invalidation mechanism: the
    /// activate phase deletes every store whose name carries another tag.
    pub cache_version: String,
    /// Base URL of the upstream dashboard origin
    pub upstream_origin: String,
    /// HTTP server port
    pub server_port: u16,
    /// Optional upstream fetch timeout in seconds (None = no deadline)
    pub fetch_timeout_secs: Option<u64>,
    /// Optional path to a JSON manifest file overriding the built-in asset list
    pub manifest_path: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_VERSION` - Deployment version tag (default: "v2")
    /// - `UPSTREAM_ORIGIN` - Upstream dashboard origin (default: http://localhost:8080)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `FETCH_TIMEOUT` - Upstream fetch timeout in seconds (default: unset, no deadline)
    /// - `MANIFEST_PATH` - Path to a JSON asset manifest (default: built-in list)
    pub fn from_env() -> Self {
        Self {
            cache_version: env::var("CACHE_VERSION").unwrap_or_else(|_| "v2".to_string()),
            upstream_origin: env::var("UPSTREAM_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT").ok().and_then(|v| v.parse().ok()),
            manifest_path: env::var("MANIFEST_PATH").ok(),
        }
    }

    /// Name of the static store current under this configuration.
    pub fn static_store_name(&self) -> String {
        format!("{}-static-{}", CACHE_PREFIX, self.cache_version)
    }

    /// Name of the dynamic store current under this configuration.
    pub fn dynamic_store_name(&self) -> String {
        format!("{}-dynamic-{}", CACHE_PREFIX, self.cache_version)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_version: "v2".to_string(),
            upstream_origin: "http://localhost:8080".to_string(),
            server_port: 3000,
            fetch_timeout_secs: None,
            manifest_path: None,
        }
    }
}

// == Static Asset Manifest ==
/// Ordered list of URLs the static store must hold after a successful install.
///
/// The list is fixed at deploy time; relative entries are resolved against
/// the upstream origin, absolute entries (CDN libraries) are kept as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub assets: Vec<String>,
}

impl Manifest {
    /// Loads a manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest file: {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse manifest file: {}", path.display()))?;
        Ok(manifest)
    }

    /// Resolves every entry against the upstream origin.
    ///
    /// Returns the resolved URLs in manifest order.
    pub fn resolve(&self, origin: &str) -> Result<Vec<Url>> {
        let base = Url::parse(origin)
            .with_context(|| format!("Invalid upstream origin: {}", origin))?;

        let mut resolved = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            let url = base
                .join(asset)
                .with_context(|| format!("Invalid manifest entry: {}", asset))?;
            resolved.push(url);
        }
        Ok(resolved)
    }
}

impl Default for Manifest {
    /// Built-in asset list for the dashboard deployment.
    fn default() -> Self {
        let assets = [
            "/",
            "/index.html",
            "/manifest.json",
            "/styles.min.css",
            "/chart-functions.min.js",
            "/bike-station-viz.min.js",
            "/theme-toggle.min.js",
            "https://d3js.org/d3.v7.min.js",
            "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/themes/prism-tomorrow.min.css",
            "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/prism.min.js",
            "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/components/prism-python.min.js",
            "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/components/prism-r.min.js",
            "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/components/prism-sql.min.js",
        ];

        Self {
            assets: assets.iter().map(|s| s.to_string()).collect(),
        }
    }
}
