//! Toggle Checkout server library.
//!
//! This crate provides the checkout API as a library, allowing it to be
//! tested and reused. The binary in `main.rs` only adds configuration
//! loading, Sentry and the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod flags;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::Request, middleware::from_fn};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router with request tracing and request IDs.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
