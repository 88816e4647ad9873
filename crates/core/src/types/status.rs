//! Payment method and order status enums.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Payment method requested by the shopper.
///
/// Anything other than the two supported methods is kept verbatim in
/// [`PaymentMethod::Other`] so the rejection can still report what was sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    CashOnDelivery,
    Other(String),
}

impl PaymentMethod {
    /// Wire code for this method (`credit_card`, `cod`, or the raw value).
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::CreditCard => "credit_card",
            Self::CashOnDelivery => "cod",
            Self::Other(raw) => raw,
        }
    }

    /// Human-readable name shown on the order, if the method is supported.
    #[must_use]
    pub const fn display_name(&self) -> Option<&'static str> {
        match self {
            Self::CreditCard => Some("Credit Card"),
            Self::CashOnDelivery => Some("Cash on Delivery"),
            Self::Other(_) => None,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "credit_card" => Self::CreditCard,
            "cod" => Self::CashOnDelivery,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Other(raw) => raw,
            known => known.code().to_owned(),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Order status.
///
/// Orders built by this crate are always `Created`; later lifecycle states
/// belong to whichever system persists the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Created,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_from_wire_code() {
        assert_eq!(PaymentMethod::from("credit_card"), PaymentMethod::CreditCard);
        assert_eq!(PaymentMethod::from("cod"), PaymentMethod::CashOnDelivery);
        assert_eq!(
            PaymentMethod::from("bitcoin"),
            PaymentMethod::Other("bitcoin".to_string())
        );
    }

    #[test]
    fn test_payment_method_codes_are_case_sensitive() {
        assert!(matches!(PaymentMethod::from("COD"), PaymentMethod::Other(_)));
    }

    #[test]
    fn test_payment_method_display_names() {
        assert_eq!(
            PaymentMethod::CreditCard.display_name(),
            Some("Credit Card")
        );
        assert_eq!(
            PaymentMethod::CashOnDelivery.display_name(),
            Some("Cash on Delivery")
        );
        assert_eq!(PaymentMethod::from("paypal").display_name(), None);
    }

    #[test]
    fn test_payment_method_serde_uses_wire_code() {
        let json = serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap_or_default();
        assert_eq!(json, "\"cod\"");

        let parsed: Result<PaymentMethod, _> = serde_json::from_str("\"wire_transfer\"");
        assert!(matches!(parsed, Ok(PaymentMethod::Other(ref raw)) if raw == "wire_transfer"));
    }

    #[test]
    fn test_order_status_display() {
        assert_eq!(OrderStatus::Created.to_string(), "created");
        let json = serde_json::to_string(&OrderStatus::Created).unwrap_or_default();
        assert_eq!(json, "\"created\"");
    }
}
