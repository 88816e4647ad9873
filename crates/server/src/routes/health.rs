//! Health check handlers.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the flag document can be read and parsed before returning OK.
/// Returns 503 Service Unavailable otherwise; checkouts would still be served,
/// but with every flag off.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.flags().try_load().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
