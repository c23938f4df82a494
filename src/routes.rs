//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`  - Short code redirect
//! - `GET  /health`  - Health check: store and access log queue
//! - `/api/*`        - Management API
//!
//! Authentication and rate limiting are expected in front of the service.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the application router with tracing applied.
///
/// The redirect handler extracts `ConnectInfo<SocketAddr>`, so the router
/// must be served with connect info (or have it injected in tests).
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Wraps a router so that `/abc/` is routed like `/abc`.
///
/// Normalization has to run before routing, which is why it wraps the whole
/// router instead of being added with `Router::layer`.
pub fn with_trailing_slash_normalization(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
