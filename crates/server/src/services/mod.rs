//! Business logic services for the checkout API.
//!
//! # Services
//!
//! - `cart` - Where the shopper's cart comes from
//! - `checkout` - Flag lookup, pricing, validation and order creation

pub mod cart;
pub mod checkout;

pub use cart::{CartError, CartSource, StaticCart};
pub use checkout::{CheckoutError, CheckoutService, PaymentOption};
