//! Cart route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use toggle_checkout_core::{CartSnapshot, Price};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Free-shipping hint shown with the cart.
#[derive(Debug, Serialize)]
pub struct NudgeView {
    pub deficit: Price,
    pub message: String,
}

/// Body of `GET /cart`.
#[derive(Debug, Serialize)]
pub struct CartView {
    #[serde(flatten)]
    pub cart: CartSnapshot,
    /// `null` unless the nudge flag is on and the cart is below the threshold.
    pub nudge: Option<NudgeView>,
}

/// Show the priced cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CartView>> {
    let (cart, flags) = state.checkout().quote().await?;

    let nudge = cart.shipping_nudge(&flags).map(|nudge| NudgeView {
        deficit: nudge.deficit,
        message: nudge.message(),
    });

    Ok(Json(CartView { cart, nudge }))
}
