//! Property-Based Tests for the Worker Module
//!
//! Uses proptest to verify classification and store-consistency properties.

use proptest::prelude::*;
use proptest::strategy::Strategy as _;
use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::Url;
use tokio::sync::RwLock;

use crate::cache::{CacheRegistry, CachedResponse, NamedStore};
use crate::fetch::{Destination, FetchRequest};
use crate::worker::test_support::{fixed_fetcher, manifest};
use crate::worker::{classify, ServiceWorker, Strategy};

// == Strategies ==
/// Generates URL path segments without policy markers.
fn plain_segment() -> impl proptest::strategy::Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}".prop_map(|s| s)
}

fn any_destination() -> impl proptest::strategy::Strategy<Value = Destination> {
    prop_oneof![
        Just(Destination::Document),
        Just(Destination::Style),
        Just(Destination::Script),
        Just(Destination::Image),
        Just(Destination::Font),
        Just(Destination::Empty),
    ]
}

/// Extensions that never trigger the cache-first marker check.
fn unmarked_extension() -> impl proptest::strategy::Strategy<Value = String> {
    prop_oneof![
        Just("png".to_string()),
        Just("woff2".to_string()),
        Just("svg".to_string()),
        Just("ico".to_string()),
        Just("txt".to_string()),
    ]
}

fn request(url: &str, destination: Destination) -> FetchRequest {
    FetchRequest::new(Url::parse(url).unwrap(), destination)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A `.css` or `.js` marker anywhere in the URL forces cache-first, no
    // matter what the request's destination says.
    #[test]
    fn prop_marker_forces_cache_first(
        segment in plain_segment(),
        ext in prop_oneof![Just("css"), Just("js")],
        destination in any_destination(),
    ) {
        let url = format!("http://host/{}.{}", segment, ext);
        let req = request(&url, destination);
        prop_assert_eq!(classify(&req, &HashSet::new()), Strategy::CacheFirst);
    }

    // Manifest membership forces cache-first even without a marker.
    #[test]
    fn prop_manifest_membership_forces_cache_first(
        segment in plain_segment(),
        ext in unmarked_extension(),
        destination in any_destination(),
    ) {
        let url = format!("http://host/{}.{}", segment, ext);
        let manifest_urls: HashSet<String> = [url.clone()].into_iter().collect();
        let req = request(&url, destination);
        prop_assert_eq!(classify(&req, &manifest_urls), Strategy::CacheFirst);
    }

    // Without markers or manifest membership, destination alone decides:
    // documents go network-first, everything else stale-while-revalidate.
    #[test]
    fn prop_destination_decides_remaining_requests(
        segment in plain_segment(),
        ext in unmarked_extension(),
        destination in any_destination(),
    ) {
        let url = format!("http://host/{}.{}", segment, ext);
        let req = request(&url, destination);
        let expected = if destination == Destination::Document {
            Strategy::NetworkFirst
        } else {
            Strategy::StaleWhileRevalidate
        };
        prop_assert_eq!(classify(&req, &HashSet::new()), expected);
    }

    // Last write wins: after any sequence of puts to one URL, lookup
    // returns the final body.
    #[test]
    fn prop_store_overwrite_keeps_last_write(
        bodies in prop::collection::vec("[a-z]{1,16}", 1..10),
    ) {
        let mut store = NamedStore::new("s");
        for body in &bodies {
            store.put(
                "http://host/entry",
                CachedResponse::new(200, vec![], Bytes::from(body.clone())),
            );
        }

        let found = store.lookup("http://host/entry").unwrap();
        prop_assert_eq!(found.body, Bytes::from(bodies.last().unwrap().clone()));
        prop_assert_eq!(store.len(), 1);
    }

    // Unified lookup: the first store in probe order holding the URL wins.
    #[test]
    fn prop_lookup_any_first_match_wins(
        in_static in any::<bool>(),
        in_dynamic in any::<bool>(),
    ) {
        let mut registry = CacheRegistry::new();
        if in_static {
            registry.put("static", "http://host/x", CachedResponse::new(200, vec![], Bytes::from_static(b"s")));
        }
        if in_dynamic {
            registry.put("dynamic", "http://host/x", CachedResponse::new(200, vec![], Bytes::from_static(b"d")));
        }

        let found = registry.lookup_any(&["static", "dynamic"], "http://host/x");
        match (in_static, in_dynamic) {
            (true, _) => prop_assert_eq!(found.unwrap().body, Bytes::from_static(b"s")),
            (false, true) => prop_assert_eq!(found.unwrap().body, Bytes::from_static(b"d")),
            (false, false) => prop_assert!(found.is_none()),
        }
    }

    // Activate reclaims exactly the stores that do not carry the current
    // names, whatever prior deployments left behind.
    #[test]
    fn prop_activate_deletes_exactly_stale_stores(
        leftovers in prop::collection::hash_set("[a-z]{1,6}-(static|dynamic)-v[0-9]", 0..8),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let registry = Arc::new(RwLock::new(CacheRegistry::new()));
            for name in &leftovers {
                registry.write().await.open(name);
            }

            let worker = ServiceWorker::new(
                "velocache-static-v2",
                "velocache-dynamic-v2",
                manifest(&["http://host/a.css"]),
                Arc::clone(&registry),
                fixed_fetcher("body"),
            );
            worker.install().await.unwrap();
            worker.activate().await.unwrap();

            let mut survivors = registry.read().await.store_names();
            survivors.sort();

            let mut expected: Vec<String> = vec!["velocache-static-v2".to_string()];
            if leftovers.contains("velocache-dynamic-v2") {
                expected.push("velocache-dynamic-v2".to_string());
            }
            expected.sort();

            assert_eq!(survivors, expected);
        });
    }
}
