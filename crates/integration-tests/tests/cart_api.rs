//! Integration tests for `GET /cart`.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::Value;
use toggle_checkout_core::FeatureFlags;
use toggle_checkout_integration_tests::{TestContext, line_item, nudge_enabled};

#[tokio::test]
async fn test_sample_cart_totals() {
    let ctx = TestContext::new(FeatureFlags::default());
    let res = ctx.get("/cart").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["subtotal"], 170);
    assert_eq!(res.body["shipping_fee"], 60);
    assert_eq!(res.body["total"], 230);
    assert_eq!(res.body["items"][0]["name"], "Sample Item");
}

#[tokio::test]
async fn test_nudge_hidden_when_flag_off() {
    let ctx = TestContext::with_cart(
        FeatureFlags::default(),
        vec![line_item("Shirt", 120, 1), line_item("Socks", 60, 1)],
    );
    let res = ctx.get("/cart").await;

    assert_eq!(res.body["total"], 240);
    assert_eq!(res.body["nudge"], Value::Null);
}

#[tokio::test]
async fn test_nudge_shown_when_flag_on() {
    let ctx = TestContext::with_cart(
        nudge_enabled(),
        vec![line_item("Shirt", 120, 1), line_item("Socks", 60, 1)],
    );
    let res = ctx.get("/cart").await;

    assert_eq!(res.body["nudge"]["deficit"], 20);
    assert_eq!(
        res.body["nudge"]["message"],
        "Spend 20 more to get free shipping"
    );
}

#[tokio::test]
async fn test_free_shipping_at_threshold() {
    let ctx = TestContext::with_cart(nudge_enabled(), vec![line_item("Boots", 100, 2)]);
    let res = ctx.get("/cart").await;

    assert_eq!(res.body["subtotal"], 200);
    assert_eq!(res.body["shipping_fee"], 0);
    assert_eq!(res.body["total"], 200);
    assert_eq!(res.body["nudge"], Value::Null);
}

#[tokio::test]
async fn test_nudge_follows_flag_flips() {
    let ctx = TestContext::new(FeatureFlags::default());
    assert_eq!(ctx.get("/cart").await.body["nudge"], Value::Null);

    ctx.flags.set_flags(nudge_enabled());
    assert_eq!(ctx.get("/cart").await.body["nudge"]["deficit"], 30);
}
