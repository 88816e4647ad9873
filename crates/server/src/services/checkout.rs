//! Checkout orchestration.
//!
//! Every call reads the flags fresh, prices the current cart and only then
//! validates, so a flag flip or a cart change is visible on the next request.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use toggle_checkout_core::{
    CartSnapshot, CheckoutRequest, CheckoutValidator, FeatureFlags, OrderFactory, OrderRecord,
    PaymentMethod, RejectionReason, ShippingRule,
};

use super::cart::{CartError, CartSource};
use crate::flags::FlagStore;

/// Why a checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The validator refused the request.
    #[error(transparent)]
    Rejected(#[from] RejectionReason),

    /// The cart could not be fetched.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A payment method the shopper can currently choose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOption {
    pub code: String,
    pub label: &'static str,
}

impl PaymentOption {
    fn new(method: &PaymentMethod) -> Option<Self> {
        Some(Self {
            code: method.code().to_string(),
            label: method.display_name()?,
        })
    }
}

/// Runs checkouts against the configured flag, cart and order sources.
#[derive(Clone)]
pub struct CheckoutService {
    flags: FlagStore,
    cart: Arc<dyn CartSource>,
    shipping: ShippingRule,
    validator: CheckoutValidator,
    orders: OrderFactory,
}

impl CheckoutService {
    #[must_use]
    pub fn new(
        flags: FlagStore,
        cart: Arc<dyn CartSource>,
        shipping: ShippingRule,
        validator: CheckoutValidator,
        orders: OrderFactory,
    ) -> Self {
        Self {
            flags,
            cart,
            shipping,
            validator,
            orders,
        }
    }

    /// Price the current cart.
    ///
    /// Returns the flags alongside so the caller can decide what to show.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart cannot be fetched.
    pub async fn quote(&self) -> Result<(CartSnapshot, FeatureFlags), CartError> {
        let flags = self.flags.load().await;
        let items = self.cart.items().await?;
        Ok((self.shipping.compute_totals(&items), flags))
    }

    /// Payment methods the shopper can pick right now.
    ///
    /// Credit card is always offered; cash on delivery only while its flag is on.
    pub async fn payment_options(&self) -> Vec<PaymentOption> {
        let flags = self.flags.load().await;

        let mut methods = vec![PaymentMethod::CreditCard];
        if flags.enable_cod {
            methods.push(PaymentMethod::CashOnDelivery);
        }

        methods.iter().filter_map(PaymentOption::new).collect()
    }

    /// Validate `request` and create an order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Rejected` when validation fails and
    /// `CheckoutError::Cart` when the cart cannot be fetched.
    pub async fn submit(&self, request: &CheckoutRequest) -> Result<OrderRecord, CheckoutError> {
        let (cart, flags) = self.quote().await?;
        let intent = self.validator.validate(request, &flags, &cart)?;
        let order = self.orders.create_order(intent, &cart);

        tracing::info!(
            order_id = %order.order_id,
            total = %order.total,
            payment_method = order.payment_method,
            "Order created"
        );
        Ok(order)
    }
}
