//! Application state shared across handlers.

use std::sync::Arc;

use toggle_checkout_core::{
    CheckoutValidator, OrderFactory, OrderIdGenerator, RandomOrderIds, SequentialOrderIds,
};

use crate::config::{OrderIdScheme, ServerConfig};
use crate::flags::{FileFlagSource, FlagSource, FlagStore};
use crate::metrics::CheckoutMetrics;
use crate::services::{CartError, CartSource, CheckoutService, StaticCart};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the flag store, the checkout service and the counters.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    flags: FlagStore,
    checkout: CheckoutService,
    metrics: Arc<CheckoutMetrics>,
}

impl AppState {
    /// Create application state from explicit flag and cart sources.
    ///
    /// Shipping, flag timeout and order ID scheme come from `config`.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        flag_source: Arc<dyn FlagSource>,
        cart: Arc<dyn CartSource>,
    ) -> Self {
        let ids: Arc<dyn OrderIdGenerator> = match config.order_ids {
            OrderIdScheme::Sequential => Arc::new(SequentialOrderIds::new()),
            OrderIdScheme::Random => Arc::new(RandomOrderIds),
        };
        Self::with_order_ids(config, flag_source, cart, ids)
    }

    /// Like [`AppState::new`], with an explicit order ID generator.
    #[must_use]
    pub fn with_order_ids(
        config: ServerConfig,
        flag_source: Arc<dyn FlagSource>,
        cart: Arc<dyn CartSource>,
        ids: Arc<dyn OrderIdGenerator>,
    ) -> Self {
        let flags = FlagStore::new(flag_source, config.flags_timeout);
        let metrics = Arc::new(CheckoutMetrics::new());
        let checkout = CheckoutService::new(
            flags.clone(),
            cart,
            config.shipping,
            CheckoutValidator::new(metrics.clone()),
            OrderFactory::new(ids),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                flags,
                checkout,
                metrics,
            }),
        }
    }

    /// Create application state reading flags and cart from the paths in `config`.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if a cart path is configured but cannot be loaded.
    pub fn from_config(config: ServerConfig) -> Result<Self, CartError> {
        let flag_source = Arc::new(FileFlagSource::new(config.flags_path.clone()));
        let cart = match &config.cart_path {
            Some(path) => StaticCart::from_file(path)?,
            None => StaticCart::sample(),
        };

        Ok(Self::new(config, flag_source, Arc::new(cart)))
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the feature flag store.
    #[must_use]
    pub fn flags(&self) -> &FlagStore {
        &self.inner.flags
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    /// Get a reference to the checkout counters.
    #[must_use]
    pub fn metrics(&self) -> &CheckoutMetrics {
        &self.inner.metrics
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[tokio::test]
    async fn test_from_config_uses_sample_cart() {
        let state = AppState::from_config(ServerConfig::default()).unwrap();
        let (cart, _) = state.checkout().quote().await.unwrap();

        assert_eq!(cart.total().amount(), 230);
    }

    #[tokio::test]
    async fn test_from_config_reads_cart_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "Boots", "price": 250, "quantity": 1}}]"#).unwrap();

        let config = ServerConfig {
            cart_path: Some(file.path().to_path_buf()),
            ..ServerConfig::default()
        };
        let state = AppState::from_config(config).unwrap();
        let (cart, _) = state.checkout().quote().await.unwrap();

        assert_eq!(cart.shipping_fee().amount(), 0);
        assert_eq!(cart.total().amount(), 250);
    }

    #[test]
    fn test_from_config_bad_cart_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            cart_path: Some(dir.path().join("missing.json")),
            ..ServerConfig::default()
        };

        assert!(AppState::from_config(config).is_err());
    }
}
