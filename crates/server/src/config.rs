//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CHECKOUT_HOST` - Bind address (default: 127.0.0.1)
//! - `CHECKOUT_PORT` - Listen port (default: 5000)
//! - `CHECKOUT_FLAGS_PATH` - Feature flag document (default: toggles.json)
//! - `CHECKOUT_FLAGS_TIMEOUT_MS` - Upper bound on a single flag read (default: 500)
//! - `CHECKOUT_CART_PATH` - JSON cart document (default: built-in sample cart)
//! - `CHECKOUT_FREE_SHIPPING_THRESHOLD` - Free shipping threshold (default: 200)
//! - `CHECKOUT_FLAT_SHIPPING_FEE` - Fee below the threshold (default: 60)
//! - `CHECKOUT_ORDER_IDS` - `sequential` or `random` (default: sequential)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use toggle_checkout_core::{FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, Price, ShippingRule};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How order IDs are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderIdScheme {
    /// Date-stamped per-process sequence.
    #[default]
    Sequential,
    /// Random UUID-based IDs.
    Random,
}

impl FromStr for OrderIdScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "random" => Ok(Self::Random),
            _ => Err(format!("expected `sequential` or `random`, got `{s}`")),
        }
    }
}

/// Checkout server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Path of the feature flag document
    pub flags_path: PathBuf,
    /// Upper bound on a single flag read
    pub flags_timeout: Duration,
    /// Path of the cart document, if not using the sample cart
    pub cart_path: Option<PathBuf>,
    /// Shipping rule applied when pricing carts
    pub shipping: ShippingRule,
    /// Order ID scheme
    pub order_ids: OrderIdScheme,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            flags_path: PathBuf::from("toggles.json"),
            flags_timeout: Duration::from_millis(500),
            cart_path: None,
            shipping: ShippingRule::default(),
            order_ids: OrderIdScheme::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_env_or_default(&lookup, "CHECKOUT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default(&lookup, "CHECKOUT_PORT", "5000")?;
        let flags_path = PathBuf::from(
            lookup("CHECKOUT_FLAGS_PATH").unwrap_or_else(|| "toggles.json".to_string()),
        );
        let flags_timeout = Duration::from_millis(parse_env_or_default(
            &lookup,
            "CHECKOUT_FLAGS_TIMEOUT_MS",
            "500",
        )?);
        let cart_path = lookup("CHECKOUT_CART_PATH").map(PathBuf::from);
        let shipping = ShippingRule {
            free_shipping_threshold: Price::new(parse_env_or_default(
                &lookup,
                "CHECKOUT_FREE_SHIPPING_THRESHOLD",
                &FREE_SHIPPING_THRESHOLD.to_string(),
            )?),
            flat_fee: Price::new(parse_env_or_default(
                &lookup,
                "CHECKOUT_FLAT_SHIPPING_FEE",
                &FLAT_SHIPPING_FEE.to_string(),
            )?),
        };
        let order_ids = parse_env_or_default(&lookup, "CHECKOUT_ORDER_IDS", "sequential")?;

        Ok(Self {
            host,
            port,
            flags_path,
            flags_timeout,
            cart_path,
            shipping,
            order_ids,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when unset.
fn parse_env_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => parse_value(key, default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
