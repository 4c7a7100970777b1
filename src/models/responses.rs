//! Response DTOs for the admin endpoints
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::worker::WorkerState;

/// One named store, as reported by the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    /// Store name, version-suffixed
    pub name: String,
    /// Number of entries currently held
    pub entries: usize,
}

/// Response body for the stats endpoint (GET /_cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of store lookups that found an entry
    pub hits: u64,
    /// Number of store lookups that found nothing
    pub misses: u64,
    /// Number of requests sent to the network
    pub network_fetches: u64,
    /// Number of store writes skipped by the scheme guard
    pub scheme_skips: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Total entries across all stores
    pub total_entries: usize,
    /// Per-store entry counts
    pub stores: Vec<StoreSummary>,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a stats snapshot.
    pub fn new(stats: &CacheStats, total_entries: usize, stores: Vec<StoreSummary>) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            network_fetches: stats.network_fetches,
            scheme_skips: stats.scheme_skips,
            hit_rate: stats.hit_rate(),
            total_entries,
            stores,
        }
    }
}

/// Response body for the health endpoint (GET /_cache/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status string
    pub status: String,
    /// Current worker lifecycle state
    pub worker_state: String,
}

impl HealthResponse {
    /// Creates a HealthResponse reflecting the worker state.
    ///
    /// The proxy reports healthy only once the worker is active and
    /// intercepting requests.
    pub fn from_state(state: WorkerState) -> Self {
        let status = if state == WorkerState::Active {
            "healthy"
        } else {
            "starting"
        };
        Self {
            status: status.to_string(),
            worker_state: format!("{:?}", state),
        }
    }
}
