//! Velocache - Offline-first caching proxy for the Cyclistic analytics dashboard
//!
//! Intercepts every request the dashboard issues, serves it through one of
//! three retrieval policies (cache-first, network-first,
//! stale-while-revalidate), and keeps two version-suffixed stores consistent
//! across deployments.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod worker;

pub use api::AppState;
pub use config::{Config, Manifest};
pub use worker::{ServiceWorker, WorkerState};
