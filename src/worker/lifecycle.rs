//! Worker Lifecycle
//!
//! Install/activate state machine for one deployed version of the caching
//! layer. Each phase is a scoped unit of work: install does not report
//! success until every manifest asset is stored, activate does not report
//! success until every stale store is gone, and interception is refused
//! until activation completes.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::Url;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cache::{CacheRegistry, NamedStore};
use crate::error::{CacheError, Result};
use crate::fetch::{Destination, FetchRequest, Fetcher};

// == Worker State ==
/// Lifecycle state of a deployed worker instance.
///
/// `Unregistered` is the implicit start; `Active` is the steady terminal
/// state until a new deployment supersedes this instance. A failed install
/// returns to `Unregistered` so the instance stays registerable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Not installed; no interception
    Unregistered,
    /// Populating the static store
    Installing,
    /// Static store committed, waiting to activate
    Installed,
    /// Reclaiming stale stores from prior versions
    Activating,
    /// Intercepting requests
    Active,
}

// == Service Worker ==
/// One deployed instance of the offline caching layer.
pub struct ServiceWorker {
    /// Name of the static store this version owns
    pub(super) static_store_name: String,
    /// Name of the dynamic store this version owns
    pub(super) dynamic_store_name: String,
    /// Resolved static asset manifest, in deploy order
    pub(super) manifest: Vec<Url>,
    /// Manifest URLs as strings, for exact-match classification
    pub(super) manifest_urls: HashSet<String>,
    /// The shared named stores
    pub(super) registry: Arc<RwLock<CacheRegistry>>,
    /// Network backend
    pub(super) fetcher: Arc<dyn Fetcher>,
    state: RwLock<WorkerState>,
    skip_waiting_requested: AtomicBool,
    clients_claimed: AtomicBool,
}

impl ServiceWorker {
    // == Constructor ==
    /// Creates an unregistered worker for one deployment version.
    ///
    /// # Arguments
    /// * `static_store_name` - Version-suffixed name of the static store
    /// * `dynamic_store_name` - Version-suffixed name of the dynamic store
    /// * `manifest` - Resolved static asset URLs, in deploy order
    /// * `registry` - Shared store registry
    /// * `fetcher` - Network backend
    pub fn new(
        static_store_name: impl Into<String>,
        dynamic_store_name: impl Into<String>,
        manifest: Vec<Url>,
        registry: Arc<RwLock<CacheRegistry>>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let manifest_urls = manifest.iter().map(|u| u.to_string()).collect();
        Self {
            static_store_name: static_store_name.into(),
            dynamic_store_name: dynamic_store_name.into(),
            manifest,
            manifest_urls,
            registry,
            fetcher,
            state: RwLock::new(WorkerState::Unregistered),
            skip_waiting_requested: AtomicBool::new(false),
            clients_claimed: AtomicBool::new(false),
        }
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    /// True once the worker has asked to take control without waiting for
    /// a previously active instance to drain.
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting_requested.load(Ordering::SeqCst)
    }

    /// True once the worker has taken over already-open clients.
    pub fn clients_claimed(&self) -> bool {
        self.clients_claimed.load(Ordering::SeqCst)
    }

    /// Shared registry handle.
    pub fn registry(&self) -> Arc<RwLock<CacheRegistry>> {
        Arc::clone(&self.registry)
    }

    // == Install ==
    /// Populates the static store with every manifest asset.
    ///
    /// Population is atomic: the store is built off to the side and only
    /// committed once every fetch has succeeded. Any single failure fails
    /// the whole install, leaves the registry untouched, and returns the
    /// worker to `Unregistered` so a fresh install can be attempted later.
    pub async fn install(&self) -> Result<()> {
        self.transition(WorkerState::Installing).await;
        info!(
            store = %self.static_store_name,
            assets = self.manifest.len(),
            "Installing: populating static store"
        );

        let mut store = NamedStore::new(&self.static_store_name);
        for url in &self.manifest {
            let request = FetchRequest::new(url.clone(), Destination::Empty);
            self.registry.write().await.stats_mut().record_network_fetch();

            match self.fetcher.fetch(&request).await {
                Ok(response) => store.put(url.to_string(), response),
                Err(err) => {
                    warn!(url = %url, error = %err, "Install fetch failed, aborting install");
                    self.transition(WorkerState::Unregistered).await;
                    return Err(CacheError::InstallFailed(format!(
                        "asset fetch failed for {}: {}",
                        url, err
                    )));
                }
            }
        }

        self.registry.write().await.insert_store(store);
        self.transition(WorkerState::Installed).await;

        // Take control without waiting for a prior instance to drain.
        self.skip_waiting_requested.store(true, Ordering::SeqCst);
        info!(store = %self.static_store_name, "Install complete, skip-waiting requested");
        Ok(())
    }

    // == Activate ==
    /// Reclaims every store left behind by prior versions.
    ///
    /// Deletes any store whose name is neither the current static nor the
    /// current dynamic name, then claims already-open clients. Cleanup
    /// completes before the worker starts intercepting requests.
    pub async fn activate(&self) -> Result<()> {
        if self.state().await != WorkerState::Installed {
            return Err(CacheError::Internal(
                "activate called before a successful install".to_string(),
            ));
        }
        self.transition(WorkerState::Activating).await;

        {
            let mut registry = self.registry.write().await;
            for name in registry.store_names() {
                if name != self.static_store_name && name != self.dynamic_store_name {
                    registry.delete_store(&name);
                    info!(store = %name, "Activate: deleted stale store");
                }
            }
        }

        self.transition(WorkerState::Active).await;
        self.clients_claimed.store(true, Ordering::SeqCst);
        info!("Activation complete, clients claimed");
        Ok(())
    }

    /// Refuses interception until the worker is active.
    pub(super) async fn ensure_active(&self) -> Result<()> {
        let state = self.state().await;
        if state == WorkerState::Active {
            Ok(())
        } else {
            Err(CacheError::NotActive(format!("worker state is {:?}", state)))
        }
    }

    async fn transition(&self, next: WorkerState) {
        let mut state = self.state.write().await;
        *state = next;
    }
}
