//! Cache Registry Module
//!
//! Process-wide collection of named stores. The registry is the only shared
//! state between the lifecycle phases and the request-routing policies; no
//! other component writes to the stores directly.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheStats, CachedResponse, NamedStore};

// == Cache Registry ==
/// All named stores known to this process, keyed by store name.
#[derive(Debug, Default)]
pub struct CacheRegistry {
    stores: HashMap<String, NamedStore>,
    stats: CacheStats,
}

impl CacheRegistry {
    // == Constructor ==
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // == Open ==
    /// Returns the store with the given name, creating it empty if absent.
    ///
    /// The dynamic store is created this way on its first write.
    pub fn open(&mut self, name: &str) -> &mut NamedStore {
        self.stores
            .entry(name.to_string())
            .or_insert_with(|| NamedStore::new(name))
    }

    /// Read-only access to a store by name.
    pub fn get(&self, name: &str) -> Option<&NamedStore> {
        self.stores.get(name)
    }

    // == Insert Store ==
    /// Commits a fully populated store, replacing any store of the same name.
    ///
    /// The install phase builds the static store off to the side and commits
    /// it here in one step, so a failed install never leaves a partially
    /// populated store visible.
    pub fn insert_store(&mut self, store: NamedStore) {
        self.stores.insert(store.name().to_string(), store);
    }

    // == Delete Store ==
    /// Deletes a store by name. Returns true when a store was removed.
    pub fn delete_store(&mut self, name: &str) -> bool {
        let removed = self.stores.remove(name).is_some();
        if removed {
            debug!(store = name, "Deleted store");
        }
        removed
    }

    /// Names of every store currently held.
    pub fn store_names(&self) -> Vec<String> {
        self.stores.keys().cloned().collect()
    }

    // == Unified Lookup ==
    /// Probes the given stores in order for `url`; first match wins.
    ///
    /// This is the "match across all stores" operation used by every
    /// routing policy. Records a hit or miss on the registry statistics.
    pub fn lookup_any(&mut self, order: &[&str], url: &str) -> Option<CachedResponse> {
        for name in order {
            if let Some(found) = self.stores.get(*name).and_then(|s| s.lookup(url)) {
                self.stats.record_hit();
                return Some(found);
            }
        }
        self.stats.record_miss();
        None
    }

    // == Put ==
    /// Stores a response in the named store, creating the store if needed.
    pub fn put(&mut self, store_name: &str, url: &str, response: CachedResponse) {
        self.open(store_name).put(url, response);
    }

    // == Stats ==
    /// Snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Mutable access for policy-level counters (network fetches, scheme skips).
    pub fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    /// Total number of entries across all stores.
    pub fn total_entries(&self) -> usize {
        self.stores.values().map(|s| s.len()).sum()
    }
}
