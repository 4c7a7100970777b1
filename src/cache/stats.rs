//! Cache Statistics Module
//!
//! Counters describing how the routing policies have used the stores.

// == Cache Stats ==
/// Performance and diagnostic counters for the caching layer.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Store lookups that found an entry
    pub hits: u64,
    /// Store lookups that found nothing
    pub misses: u64,
    /// Requests that went out to the network
    pub network_fetches: u64,
    /// Store writes skipped by the URL scheme guard.
    ///
    /// Skips are silent toward the caller; this counter is the diagnostic
    /// hook for observing them.
    pub scheme_skips: u64,
}

impl CacheStats {
    /// Creates a new stats instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a store lookup that found an entry.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Records a store lookup that found nothing.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Records a request going out to the network.
    pub fn record_network_fetch(&mut self) {
        self.network_fetches += 1;
    }

    /// Records a store write skipped by the scheme guard.
    pub fn record_scheme_skip(&mut self) {
        self.scheme_skips += 1;
    }

    /// Hit rate across all lookups, 0.0 when no lookups have happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
