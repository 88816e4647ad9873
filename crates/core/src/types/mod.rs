//! Core value types.
//!
//! This module provides type-safe wrappers for prices, order identifiers and
//! the small enums shared by pricing, validation and order creation.

pub mod id;
pub mod line_item;
pub mod price;
pub mod status;

pub use id::OrderId;
pub use line_item::{LineItem, LineItemError};
pub use price::Price;
pub use status::*;
