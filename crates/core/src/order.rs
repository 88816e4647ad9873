//! Order creation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::checkout::OrderIntent;
use crate::pricing::CartSnapshot;
use crate::types::{OrderId, OrderStatus, Price};

/// Prefix shared by every generated order ID.
pub const ORDER_ID_PREFIX: &str = "ORD-";

/// An order created from an accepted checkout.
///
/// Records are immutable; persisting them is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub total: Price,
    /// Display name of the payment method.
    pub payment_method: &'static str,
    pub delivery_method: String,
    pub invoice_type: String,
    pub status: OrderStatus,
}

/// Source of order identifiers.
pub trait OrderIdGenerator: Send + Sync {
    /// Produce an identifier not handed out before.
    fn next_id(&self) -> OrderId;
}

/// Date-stamped per-process sequence: `ORD-YYYYMMDDNNNNN`.
///
/// The sequence starts at 1 and never resets while the process runs, so IDs
/// stay unique across midnight. IDs are only unique within one process.
#[derive(Debug, Default)]
pub struct SequentialOrderIds {
    next: AtomicU64,
}

impl SequentialOrderIds {
    /// Create a generator whose first ID uses sequence number 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Format an ID for `date` and `sequence`.
    #[must_use]
    pub fn format(date: NaiveDate, sequence: u64) -> OrderId {
        OrderId::new(format!(
            "{ORDER_ID_PREFIX}{}{sequence:05}",
            date.format("%Y%m%d")
        ))
    }
}

impl OrderIdGenerator for SequentialOrderIds {
    fn next_id(&self) -> OrderId {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Self::format(Utc::now().date_naive(), sequence)
    }
}

/// Random identifiers: `ORD-` followed by a v4 UUID in simple form.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderIds;

impl OrderIdGenerator for RandomOrderIds {
    fn next_id(&self) -> OrderId {
        OrderId::new(format!("{ORDER_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }
}

/// Builds [`OrderRecord`]s for accepted checkouts.
#[derive(Clone)]
pub struct OrderFactory {
    ids: Arc<dyn OrderIdGenerator>,
}

impl Default for OrderFactory {
    fn default() -> Self {
        Self::new(Arc::new(SequentialOrderIds::new()))
    }
}

impl OrderFactory {
    /// Create a factory drawing IDs from `ids`.
    #[must_use]
    pub fn new(ids: Arc<dyn OrderIdGenerator>) -> Self {
        Self { ids }
    }

    /// Create the order for an accepted checkout.
    ///
    /// The total always comes from `cart`, never from the request.
    #[must_use]
    pub fn create_order(&self, intent: OrderIntent, cart: &CartSnapshot) -> OrderRecord {
        OrderRecord {
            order_id: self.ids.next_id(),
            total: cart.total(),
            payment_method: intent.payment_method_display,
            delivery_method: intent.delivery_method,
            invoice_type: intent.invoice_type,
            status: OrderStatus::Created,
        }
    }
}
