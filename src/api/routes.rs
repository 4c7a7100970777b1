//! API Routes
//!
//! Configures the Axum router: two admin endpoints plus a fallback that
//! intercepts every other request the page issues.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, intercept_handler, stats_handler, AppState};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /_cache/stats` - Routing counters and per-store entry counts
/// - `GET /_cache/health` - Worker lifecycle health
/// - anything else - Intercepted and routed through the worker
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/_cache/stats", get(stats_handler))
        .route("/_cache/health", get(health_handler))
        .fallback(intercept_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use reqwest::Url;
    use tokio::sync::RwLock;
    use tower::util::ServiceExt;

    use crate::cache::CacheRegistry;
    use crate::worker::test_support::{fixed_fetcher, manifest};
    use crate::worker::ServiceWorker;

    async fn create_test_app() -> Router {
        let registry = Arc::new(RwLock::new(CacheRegistry::new()));
        let worker = Arc::new(ServiceWorker::new(
            "velocache-static-v2",
            "velocache-dynamic-v2",
            manifest(&["http://localhost:8080/a.css"]),
            registry,
            fixed_fetcher("asset body"),
        ));
        worker.install().await.unwrap();
        worker.activate().await.unwrap();

        let state = AppState::new(worker, Url::parse("http://localhost:8080").unwrap());
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_cache/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_cache/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_fallback_intercepts_asset_request() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/a.css")
                    .header("sec-fetch-dest", "style")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"asset body");
    }

    #[tokio::test]
    async fn test_fallback_rejects_non_get() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/submit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
