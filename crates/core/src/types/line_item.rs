//! Cart line items.

use serde::{Deserialize, Serialize};

use super::Price;

/// Errors that can occur when building a [`LineItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineItemError {
    /// The item name is empty.
    #[error("line item name cannot be empty")]
    EmptyName,
    /// The quantity is zero.
    #[error("line item quantity must be at least 1")]
    ZeroQuantity,
}

/// A product line in a cart.
///
/// ## Constraints
///
/// - `name` is not empty
/// - `quantity` is at least 1
///
/// Line items are immutable; changing a quantity means building a new item.
///
/// ## Examples
///
/// ```
/// use toggle_checkout_core::{LineItem, Price};
///
/// let item = LineItem::new("Notebook", Price::new(120), 2).unwrap();
/// assert_eq!(item.line_total(), Price::new(240));
///
/// assert!(LineItem::new("Notebook", Price::new(120), 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLineItem")]
pub struct LineItem {
    name: String,
    unit_price: Price,
    quantity: u32,
}

/// Unvalidated wire form of a line item.
///
/// Cart documents written by older tooling use `price` for the unit price.
#[derive(Deserialize)]
struct RawLineItem {
    name: String,
    #[serde(alias = "price")]
    unit_price: Price,
    quantity: u32,
}

impl TryFrom<RawLineItem> for LineItem {
    type Error = LineItemError;

    fn try_from(raw: RawLineItem) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.unit_price, raw.quantity)
    }
}

impl LineItem {
    /// Create a validated line item.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the quantity is zero.
    pub fn new(
        name: impl Into<String>,
        unit_price: Price,
        quantity: u32,
    ) -> Result<Self, LineItemError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LineItemError::EmptyName);
        }
        if quantity == 0 {
            return Err(LineItemError::ZeroQuantity);
        }

        Ok(Self {
            name,
            unit_price,
            quantity,
        })
    }

    /// Product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price of a single unit.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Number of units.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}
