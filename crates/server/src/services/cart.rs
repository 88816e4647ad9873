//! Cart lookup.
//!
//! The checkout API does not manage carts itself; it asks a [`CartSource`]
//! for the current line items and prices them on every request.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use toggle_checkout_core::{LineItem, Price};

/// Errors returned while fetching a cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart document could not be read.
    #[error("failed to read cart {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The cart document is not a list of valid line items.
    #[error("invalid cart document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backing cart service could not be reached.
    #[error("cart unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere the current cart can be fetched from.
#[async_trait]
pub trait CartSource: Send + Sync {
    /// Fetch the line items of the current cart.
    async fn items(&self) -> Result<Vec<LineItem>, CartError>;
}

/// A fixed cart, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticCart {
    items: Vec<LineItem>,
}

impl StaticCart {
    /// Create a cart holding `items`.
    #[must_use]
    pub const fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// The demo cart: one "Sample Item" at 170.
    ///
    /// Sits below the free-shipping threshold, so the default rule charges
    /// shipping and the nudge has something to say.
    #[must_use]
    pub fn sample() -> Self {
        let item = LineItem::new("Sample Item", Price::new(170), 1);
        Self::new(item.into_iter().collect())
    }

    /// Parse a JSON array of line items.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Parse` if the document is not a valid item list.
    pub fn from_json(document: &str) -> Result<Self, CartError> {
        Ok(Self::new(serde_json::from_str(document)?))
    }

    /// Load a JSON array of line items from `path`.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, CartError> {
        let document = std::fs::read_to_string(path).map_err(|source| CartError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&document)
    }
}

#[async_trait]
impl CartSource for StaticCart {
    async fn items(&self) -> Result<Vec<LineItem>, CartError> {
        Ok(self.items.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[tokio::test]
    async fn test_sample_cart() {
        let items = StaticCart::sample().items().await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name(), "Sample Item");
        assert_eq!(items[0].line_total(), Price::new(170));
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Shirt", "price": 120, "quantity": 1}},
                {{"name": "Socks", "unit_price": 30, "quantity": 2}}]"#
        )
        .unwrap();

        let items = StaticCart::from_file(file.path()).unwrap().items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].line_total(), Price::new(60));
    }

    #[test]
    fn test_invalid_items_rejected() {
        let result = StaticCart::from_json(r#"[{"name": "Shirt", "price": 120, "quantity": 0}]"#);
        assert!(matches!(result, Err(CartError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = StaticCart::from_file(&dir.path().join("cart.json"));
        assert!(matches!(result, Err(CartError::Io { .. })));
    }
}
