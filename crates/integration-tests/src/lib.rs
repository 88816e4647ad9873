//! Integration tests for Toggle Checkout.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p toggle-checkout-integration-tests
//! ```
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; no
//! listener or flag file is needed. [`TestContext`] wires an in-memory flag
//! source and a fixed cart into the real application state.
//!
//! # Test Categories
//!
//! - `checkout_api` - Payment validation and order creation
//! - `cart_api` - Pricing and the free-shipping nudge
//! - `health` - Liveness, readiness and request IDs

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use toggle_checkout_core::{FeatureFlags, LineItem, Price};
use toggle_checkout_server::{
    app, config::ServerConfig, flags::InMemoryFlagSource, services::StaticCart, state::AppState,
};
use tower::ServiceExt;

/// A response reduced to what tests assert on.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Application state plus handles on its fakes.
pub struct TestContext {
    pub state: AppState,
    pub flags: Arc<InMemoryFlagSource>,
}

impl TestContext {
    /// Context with the demo cart ("Sample Item", 170 x 1).
    #[must_use]
    pub fn new(flags: FeatureFlags) -> Self {
        Self::with_cart(flags, vec![line_item("Sample Item", 170, 1)])
    }

    /// Context with a custom cart.
    #[must_use]
    pub fn with_cart(flags: FeatureFlags, items: Vec<LineItem>) -> Self {
        let source = Arc::new(InMemoryFlagSource::with_flags(flags));
        let state = AppState::new(
            ServerConfig::default(),
            source.clone(),
            Arc::new(StaticCart::new(items)),
        );

        Self {
            state,
            flags: source,
        }
    }

    /// A fresh router over the shared state.
    #[must_use]
    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    /// Send `request` and collect the response.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router().oneshot(request).await.unwrap_or_else(|e| match e {});
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = match response.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => panic!("failed to read body: {e}"),
        };
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(build(Request::get(uri), Body::empty())).await
    }

    /// POST a form-encoded body to `/checkout`.
    pub async fn checkout_form(&self, form: &str) -> TestResponse {
        let request = Request::post("/checkout")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(build(request, Body::from(form.to_owned()))).await
    }

    /// POST a JSON body to `/checkout`.
    pub async fn checkout_json(&self, body: &Value) -> TestResponse {
        self.checkout_as("application/json", body.to_string()).await
    }

    /// POST `body` to `/checkout` with an explicit `Content-Type`.
    pub async fn checkout_as(&self, content_type: &str, body: String) -> TestResponse {
        let request = Request::post("/checkout").header(header::CONTENT_TYPE, content_type);
        self.send(build(request, Body::from(body))).await
    }
}

fn build(builder: axum::http::request::Builder, body: Body) -> Request<Body> {
    match builder.body(body) {
        Ok(request) => request,
        Err(e) => panic!("invalid test request: {e}"),
    }
}

/// Build a line item, panicking on invalid input.
///
/// # Panics
///
/// Panics if `name` is empty or `quantity` is zero.
#[must_use]
pub fn line_item(name: &str, price: u64, quantity: u32) -> LineItem {
    match LineItem::new(name, Price::new(price), quantity) {
        Ok(item) => item,
        Err(e) => panic!("invalid line item: {e}"),
    }
}

/// Flags with cash on delivery on.
#[must_use]
pub fn cod_enabled() -> FeatureFlags {
    FeatureFlags {
        enable_cod: true,
        ..FeatureFlags::default()
    }
}

/// Flags with the free-shipping nudge on.
#[must_use]
pub fn nudge_enabled() -> FeatureFlags {
    FeatureFlags {
        enable_free_shipping_nudge: true,
        ..FeatureFlags::default()
    }
}
