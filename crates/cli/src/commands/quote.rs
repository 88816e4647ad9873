//! Cart pricing from the command line.
//!
//! The shipping rule is resolved the way the server resolves it:
//! `CHECKOUT_FREE_SHIPPING_THRESHOLD` and `CHECKOUT_FLAT_SHIPPING_FEE`, with
//! `--threshold` and `--fee` taking precedence.

use std::fmt::Write as _;
use std::path::Path;

use thiserror::Error;
use toggle_checkout_core::{CartSnapshot, FeatureFlags, LineItem, Price, ShippingRule};

use super::flags;

/// Errors resolving the shipping rule.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Invalid environment variable {key}: {message}")]
    InvalidEnvVar { key: &'static str, message: String },
}

/// Resolve the shipping rule from explicit values, then `lookup`, then defaults.
///
/// # Errors
///
/// Returns `QuoteError::InvalidEnvVar` if a variable is set but not a whole
/// amount.
pub fn shipping_rule(
    threshold: Option<u64>,
    fee: Option<u64>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ShippingRule, QuoteError> {
    let defaults = ShippingRule::default();
    let resolve = |explicit: Option<u64>, key: &'static str, default: Price| {
        if let Some(amount) = explicit {
            return Ok(Price::new(amount));
        }
        match lookup(key) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Price::new)
                .map_err(|e| QuoteError::InvalidEnvVar {
                    key,
                    message: e.to_string(),
                }),
            None => Ok(default),
        }
    };

    Ok(ShippingRule {
        free_shipping_threshold: resolve(
            threshold,
            "CHECKOUT_FREE_SHIPPING_THRESHOLD",
            defaults.free_shipping_threshold,
        )?,
        flat_fee: resolve(fee, "CHECKOUT_FLAT_SHIPPING_FEE", defaults.flat_fee)?,
    })
}

/// Price the cart at `cart_path` under `rule` and print a receipt.
///
/// The nudge line is only printed when `flags_path` is given and turns the
/// nudge on.
///
/// # Errors
///
/// Returns an error if the cart cannot be read or parsed.
#[allow(clippy::print_stdout)]
pub async fn run(
    cart_path: &Path,
    flags_path: Option<&Path>,
    rule: ShippingRule,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = tokio::fs::read_to_string(cart_path).await?;
    let items: Vec<LineItem> = serde_json::from_str(&document)?;

    let flags = match flags_path {
        Some(path) => flags::effective(path).await,
        None => FeatureFlags::default(),
    };

    print!("{}", render(&rule.compute_totals(&items), &flags));
    Ok(())
}

fn render(cart: &CartSnapshot, flags: &FeatureFlags) -> String {
    let mut out = String::new();

    for item in cart.items() {
        let _ = writeln!(
            out,
            "{:<24} {:>4} x {:>8} = {:>8}",
            item.name(),
            item.quantity(),
            item.unit_price(),
            item.line_total()
        );
    }
    let _ = writeln!(out, "{:<41} {:>8}", "Subtotal", cart.subtotal());
    let _ = writeln!(out, "{:<41} {:>8}", "Shipping", cart.shipping_fee());
    let _ = writeln!(out, "{:<41} {:>8}", "Total", cart.total());

    if let Some(nudge) = cart.shipping_nudge(flags) {
        let _ = writeln!(out, "\n{}", nudge.message());
    }

    out
}
