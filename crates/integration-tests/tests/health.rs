//! Integration tests for health checks and request IDs.

#![allow(clippy::unwrap_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use toggle_checkout_core::FeatureFlags;
use toggle_checkout_integration_tests::TestContext;

#[tokio::test]
async fn test_liveness() {
    let ctx = TestContext::new(FeatureFlags::default());
    let res = ctx.get("/health").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "ok");
}

#[tokio::test]
async fn test_readiness_tracks_flag_document() {
    let ctx = TestContext::new(FeatureFlags::default());
    assert_eq!(ctx.get("/health/ready").await.status, StatusCode::OK);

    ctx.flags.set_document("not json");
    assert_eq!(
        ctx.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );

    ctx.flags.clear();
    assert_eq!(
        ctx.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_every_response_has_request_id() {
    let ctx = TestContext::new(FeatureFlags::default());

    for res in [
        ctx.get("/health").await,
        ctx.get("/cart").await,
        ctx.checkout_form("payment_method=cod").await,
    ] {
        assert!(res.headers.contains_key("x-request-id"));
    }
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new(FeatureFlags::default());
    let request = Request::get("/health")
        .header("x-request-id", "trace-123")
        .body(Body::empty())
        .unwrap();
    let res = ctx.send(request).await;

    assert_eq!(res.headers["x-request-id"], "trace-123");
}
