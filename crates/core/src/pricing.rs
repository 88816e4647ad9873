//! Cart pricing.
//!
//! Totals are always derived from the canonical item list; nothing a client
//! sends is trusted as a subtotal or total. The shipping rule is a single
//! hard threshold: at or above it shipping is free, below it a flat fee
//! applies.

use serde::{Deserialize, Serialize};

use crate::flags::FeatureFlags;
use crate::types::{LineItem, Price};

/// Subtotal at or above which shipping is waived.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::new(200);

/// Shipping fee charged below [`FREE_SHIPPING_THRESHOLD`].
pub const FLAT_SHIPPING_FEE: Price = Price::new(60);

/// Threshold-based shipping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRule {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Price,
    /// Fee charged when the subtotal is below the threshold.
    pub flat_fee: Price,
}

impl Default for ShippingRule {
    fn default() -> Self {
        Self {
            free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
            flat_fee: FLAT_SHIPPING_FEE,
        }
    }
}

impl ShippingRule {
    /// Shipping fee for a given subtotal.
    #[must_use]
    pub fn fee_for(&self, subtotal: Price) -> Price {
        if subtotal >= self.free_shipping_threshold {
            Price::ZERO
        } else {
            self.flat_fee
        }
    }

    /// Price a list of items under this rule.
    #[must_use]
    pub fn compute_totals(&self, items: &[LineItem]) -> CartSnapshot {
        let subtotal: Price = items.iter().map(LineItem::line_total).sum();
        let shipping_fee = self.fee_for(subtotal);

        CartSnapshot {
            items: items.to_vec(),
            subtotal,
            shipping_fee,
            total: subtotal.saturating_add(shipping_fee),
            free_shipping_threshold: self.free_shipping_threshold,
        }
    }
}

/// Price a list of items under the default shipping rule.
///
/// ```
/// use toggle_checkout_core::{compute_totals, LineItem, Price};
///
/// let items = vec![
///     LineItem::new("Shirt", Price::new(120), 1).unwrap(),
///     LineItem::new("Socks", Price::new(60), 1).unwrap(),
/// ];
/// let cart = compute_totals(&items);
/// assert_eq!(cart.subtotal(), Price::new(180));
/// assert_eq!(cart.shipping_fee(), Price::new(60));
/// assert_eq!(cart.total(), Price::new(240));
/// ```
#[must_use]
pub fn compute_totals(items: &[LineItem]) -> CartSnapshot {
    ShippingRule::default().compute_totals(items)
}

/// Priced view of a cart at one point in time.
///
/// Only [`ShippingRule::compute_totals`] builds snapshots, so
/// `total == subtotal + shipping_fee` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    items: Vec<LineItem>,
    subtotal: Price,
    shipping_fee: Price,
    total: Price,
    free_shipping_threshold: Price,
}

impl CartSnapshot {
    /// Items in cart order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of all line totals.
    #[must_use]
    pub const fn subtotal(&self) -> Price {
        self.subtotal
    }

    /// Shipping fee under the rule the cart was priced with.
    #[must_use]
    pub const fn shipping_fee(&self) -> Price {
        self.shipping_fee
    }

    /// Amount due.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Returns `true` if the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How much more the shopper must spend to reach free shipping.
    ///
    /// `None` once the threshold is met.
    #[must_use]
    pub fn free_shipping_deficit(&self) -> Option<Price> {
        let deficit = self.free_shipping_threshold.saturating_sub(self.subtotal);
        (!deficit.is_zero()).then_some(deficit)
    }

    /// Free-shipping hint to show the shopper, if the nudge flag is on.
    #[must_use]
    pub fn shipping_nudge(&self, flags: &FeatureFlags) -> Option<ShippingNudge> {
        if !flags.enable_free_shipping_nudge {
            return None;
        }
        self.free_shipping_deficit().map(|deficit| ShippingNudge { deficit })
    }
}

/// "Spend a bit more" hint for carts below the free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShippingNudge {
    /// Amount still needed to reach free shipping.
    pub deficit: Price,
}

impl ShippingNudge {
    /// Message suitable for display next to the cart total.
    #[must_use]
    pub fn message(&self) -> String {
        format!("Spend {} more to get free shipping", self.deficit)
    }
}
