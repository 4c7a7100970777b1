//! API Module
//!
//! HTTP surface of the proxy: the request-interception fallback and the
//! admin endpoints.
//!
//! # Endpoints
//! - `GET /_cache/stats` - Routing counters and per-store entry counts
//! - `GET /_cache/health` - Worker lifecycle health
//! - anything else - Intercepted and routed through the worker

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
