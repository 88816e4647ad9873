//! Checkout route handlers.

use axum::{
    Form, Json,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
};
use serde::Serialize;
use toggle_checkout_core::{CheckoutRequest, OrderRecord};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::PaymentOption;
use crate::state::AppState;

/// A checkout request read from either a JSON or a form-encoded body.
///
/// JSON is used when the `Content-Type` is `application/json` or an
/// `application/*+json` type; anything else is treated as a form post.
#[derive(Debug)]
pub struct CheckoutSubmission(pub CheckoutRequest);

impl<S> FromRequest<S> for CheckoutSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);

        let request = if is_json {
            Json::<CheckoutRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?
                .0
        } else {
            Form::<CheckoutRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?
                .0
        };

        Ok(Self(request))
    }
}

/// Whether `content_type` names a JSON media type.
///
/// Parameters such as `charset` are ignored and matching is case-insensitive.
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Body of a successful checkout.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub status: &'static str,
    pub message: String,
    pub order: OrderRecord,
}

/// Body of `GET /payment/methods`.
#[derive(Debug, Serialize)]
pub struct PaymentMethodsView {
    pub methods: Vec<PaymentOption>,
}

/// Validate a checkout and create the order.
#[instrument(skip(state))]
pub async fn submit(
    State(state): State<AppState>,
    CheckoutSubmission(request): CheckoutSubmission,
) -> Result<Json<CheckoutResponse>> {
    let order = state.checkout().submit(&request).await?;

    Ok(Json(CheckoutResponse {
        status: "success",
        message: format!("Order created. Payment method: {}", order.payment_method),
        order,
    }))
}

/// List the payment methods currently offered.
#[instrument(skip(state))]
pub async fn payment_methods(State(state): State<AppState>) -> Json<PaymentMethodsView> {
    Json(PaymentMethodsView {
        methods: state.checkout().payment_options().await,
    })
}
