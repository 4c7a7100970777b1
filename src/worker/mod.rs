//! Worker Module
//!
//! The offline caching layer itself: the install/activate lifecycle that
//! keeps the named stores consistent with the deployed version, and the
//! routing policies applied to every intercepted request.

mod lifecycle;
mod router;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use lifecycle::{ServiceWorker, WorkerState};
pub use router::{classify, Strategy};

// == Test Support ==
#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use bytes::Bytes;
    use reqwest::Url;

    use crate::cache::CachedResponse;
    use crate::fetch::{FetchError, FetchRequest, Fetcher};

    /// What the mock network does for one URL.
    #[derive(Debug, Clone)]
    pub enum Outcome {
        /// Resolve with a 200 response carrying this body
        Respond(String),
        /// Fail with a transport error
        Fail,
        /// Never resolve
        Hang,
    }

    /// Programmable network backend for tests.
    ///
    /// Outcomes are per-URL, with an optional catch-all default; every
    /// fetch is counted so tests can assert exactly how often the network
    /// was touched.
    #[derive(Default)]
    pub struct MockFetcher {
        outcomes: Mutex<HashMap<String, Outcome>>,
        default_outcome: Mutex<Option<Outcome>>,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl MockFetcher {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Shorthand for a 200 response with the given body.
        pub fn respond(&self, url: &str, body: &str) {
            self.set_outcome(url, Outcome::Respond(body.to_string()));
        }

        pub fn set_outcome(&self, url: &str, outcome: Outcome) {
            self.outcomes
                .lock()
                .unwrap()
                .insert(url.to_string(), outcome);
        }

        pub fn set_default(&self, outcome: Outcome) {
            *self.default_outcome.lock().unwrap() = Some(outcome);
        }

        /// Number of fetches issued for this URL.
        pub fn calls(&self, url: &str) -> usize {
            self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, FetchError> {
            let url = request.url.to_string();
            *self.calls.lock().unwrap().entry(url.clone()).or_insert(0) += 1;

            // Resolve the outcome before awaiting anything so no lock is
            // held across a suspension point.
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .get(&url)
                .cloned()
                .or_else(|| self.default_outcome.lock().unwrap().clone());

            match outcome {
                Some(Outcome::Respond(body)) => {
                    Ok(CachedResponse::new(200, vec![], Bytes::from(body)))
                }
                Some(Outcome::Hang) => std::future::pending().await,
                Some(Outcome::Fail) | None => Err(FetchError::Transport {
                    url,
                    message: "connection refused".to_string(),
                }),
            }
        }
    }

    /// Mock that answers every URL with the same body.
    pub fn fixed_fetcher(body: &str) -> Arc<MockFetcher> {
        let fetcher = MockFetcher::new();
        fetcher.set_default(Outcome::Respond(body.to_string()));
        fetcher
    }

    /// Mock that fails every fetch.
    pub fn failing_fetcher() -> Arc<MockFetcher> {
        let fetcher = MockFetcher::new();
        fetcher.set_default(Outcome::Fail);
        fetcher
    }

    /// Parses a slice of URL strings into a resolved manifest.
    pub fn manifest(urls: &[&str]) -> Vec<Url> {
        urls.iter().map(|u| Url::parse(u).unwrap()).collect()
    }
}
