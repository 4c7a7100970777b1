//! Models Module
//!
//! Serializable DTOs for the admin endpoints.

mod responses;

pub use responses::{HealthResponse, StatsResponse, StoreSummary};
