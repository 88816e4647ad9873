//! Toggle Checkout Core - Pricing, feature flags and checkout validation.
//!
//! This crate holds everything that decides whether a checkout goes through:
//! - `server` - HTTP service that loads flags and carts and calls into here
//! - `cli` - Operator tooling for flag documents and cart quotes
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no I/O, no
//! async, no logging. Loading flags, fetching carts and recording metrics are
//! the caller's job; the traits here ([`CheckoutObserver`],
//! [`OrderIdGenerator`]) are the seams where the caller plugs them in.
//!
//! # Modules
//!
//! - [`types`] - Prices, line items, order IDs and status enums
//! - [`pricing`] - Subtotal, shipping fee and free-shipping nudge
//! - [`flags`] - Feature flag schema and flag document parsing
//! - [`checkout`] - Checkout requests and the validator
//! - [`order`] - Order records and ID generation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod flags;
pub mod order;
pub mod pricing;
pub mod types;

pub use checkout::{
    CheckoutDecision, CheckoutObserver, CheckoutRequest, CheckoutValidator, NoopObserver,
    OrderIntent, RejectionReason, decide,
};
pub use flags::{FeatureFlag, FeatureFlags, FlagDocumentError, UnknownFlag};
pub use order::{OrderFactory, OrderIdGenerator, OrderRecord, RandomOrderIds, SequentialOrderIds};
pub use pricing::{
    CartSnapshot, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, ShippingNudge, ShippingRule,
    compute_totals,
};
pub use types::*;
