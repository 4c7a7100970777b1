//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caching proxy.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Static store population failed during the install phase
    #[error("Install failed: {0}")]
    InstallFailed(String),

    /// Upstream fetch failed and no cached fallback existed
    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    /// Request arrived before the worker reached the active state
    #[error("Worker not active: {0}")]
    NotActive(String),

    /// Request cannot be handled by the interception surface
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal proxy error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::InstallFailed(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            CacheError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            CacheError::NotActive(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching proxy.
pub type Result<T> = std::result::Result<T, CacheError>;
