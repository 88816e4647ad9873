//! HTTP route handlers for the checkout API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (flag document readable)
//!
//! # Cart
//! GET  /cart                   - Priced cart plus free-shipping nudge
//!
//! # Checkout
//! GET  /payment/methods        - Payment methods currently offered
//! POST /checkout               - Validate and create an order (form or JSON)
//! ```

pub mod cart;
pub mod checkout;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the checkout API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/cart", get(cart::show))
        .route("/payment/methods", get(checkout::payment_methods))
        .route("/checkout", post(checkout::submit))
}
