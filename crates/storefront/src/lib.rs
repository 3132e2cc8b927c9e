//! Aurelia storefront library.
//!
//! Server-rendered furniture storefront with a cookie-backed cart. The
//! binary in `main.rs` adds Sentry and a listener; everything else lives
//! here so it can be driven in-process by tests and the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, body::Body, http::Request, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Build the storefront router with its middleware stack.
///
/// `rate_limited` enables the per-IP limiter on cart mutations. It needs the
/// peer address, so only enable it when serving with connect info.
pub fn app(state: AppState, rate_limited: bool) -> Router {
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(rate_limited))
        .nest_service("/static", static_dir)
        .fallback(routes::not_found)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. The catalog is loaded before the
/// listener binds, so there is nothing further to probe.
async fn health() -> &'static str {
    "ok"
}
