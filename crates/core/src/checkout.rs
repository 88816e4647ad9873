//! Checkout validation.
//!
//! The validator is the server-side half of a feature toggle: whatever the
//! payment page offered, a request is only accepted if the flags loaded for
//! *this* request allow it. Decisions are made in a fixed order and the first
//! failing step wins:
//!
//! 1. Toggle enforcement (`cod` while `enable_cod` is off)
//! 2. Payment details (card fields present for `credit_card`)
//! 3. Method support (anything other than `credit_card` / `cod`)

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::flags::FeatureFlags;
use crate::pricing::CartSnapshot;
use crate::types::{PaymentMethod, Price};

/// Delivery method used when the request does not name one.
pub const DEFAULT_DELIVERY_METHOD: &str = "home_delivery";

/// Invoice type used when the request does not name one.
pub const DEFAULT_INVOICE_TYPE: &str = "mobile_carrier";

fn default_delivery_method() -> String {
    DEFAULT_DELIVERY_METHOD.to_owned()
}

fn default_invoice_type() -> String {
    DEFAULT_INVOICE_TYPE.to_owned()
}

/// A checkout submission as received from the client.
///
/// Implements `Debug` manually to redact card fields.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutRequest {
    /// Requested payment method; `credit_card` when omitted.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Card number (credit card only).
    pub card_number: Option<String>,
    /// Card expiry, typically `MM/YY` (credit card only).
    pub expiry_date: Option<String>,
    /// Card security code (credit card only).
    pub cvv: Option<String>,
    /// Delivery method, passed through to the order.
    #[serde(default = "default_delivery_method")]
    pub delivery_method: String,
    /// Invoice type, passed through to the order.
    #[serde(default = "default_invoice_type")]
    pub invoice_type: String,
}

impl CheckoutRequest {
    /// A request for `method` with no card details and default delivery and
    /// invoice settings.
    #[must_use]
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            payment_method: method,
            card_number: None,
            expiry_date: None,
            cvv: None,
            delivery_method: default_delivery_method(),
            invoice_type: default_invoice_type(),
        }
    }

    /// Attach card details.
    #[must_use]
    pub fn with_card(
        mut self,
        card_number: impl Into<String>,
        expiry_date: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        self.card_number = Some(card_number.into());
        self.expiry_date = Some(expiry_date.into());
        self.cvv = Some(cvv.into());
        self
    }

    fn has_card_details(&self) -> bool {
        [&self.card_number, &self.expiry_date, &self.cvv]
            .into_iter()
            .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

impl std::fmt::Debug for CheckoutRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |field: &Option<String>| field.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("CheckoutRequest")
            .field("payment_method", &self.payment_method)
            .field("card_number", &redact(&self.card_number))
            .field("expiry_date", &redact(&self.expiry_date))
            .field("cvv", &redact(&self.cvv))
            .field("delivery_method", &self.delivery_method)
            .field("invoice_type", &self.invoice_type)
            .finish()
    }
}

/// Why a checkout was refused.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// The requested method is switched off by a feature flag.
    #[error("Cash on delivery is currently unavailable")]
    FeatureDisabled,
    /// Required payment fields are missing or empty.
    #[error("Please complete all credit card fields")]
    InvalidPaymentDetails,
    /// The payment method is not one the store accepts.
    #[error("Unsupported payment method")]
    UnsupportedPaymentMethod,
}

impl RejectionReason {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::FeatureDisabled => "FEATURE_DISABLED",
            Self::InvalidPaymentDetails => "INVALID_PAYMENT_DETAILS",
            Self::UnsupportedPaymentMethod => "UNSUPPORTED_PAYMENT_METHOD",
        }
    }
}

/// An accepted checkout, ready to become an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderIntent {
    /// Method the shopper will pay with.
    pub payment_method: PaymentMethod,
    /// Display name of the payment method.
    pub payment_method_display: &'static str,
    /// Delivery method from the request.
    pub delivery_method: String,
    /// Invoice type from the request.
    pub invoice_type: String,
}

/// Outcome reported to a [`CheckoutObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutDecision<'a> {
    /// The checkout was accepted for `total`.
    Accepted {
        method: &'a PaymentMethod,
        total: Price,
    },
    /// The checkout was refused.
    Rejected {
        method: &'a PaymentMethod,
        reason: RejectionReason,
    },
}

/// Side channel notified after every decision.
///
/// Observers see decisions but cannot change them; use one for counters,
/// audit logs and the like.
pub trait CheckoutObserver: Send + Sync {
    /// Called once per validation, after the decision is final.
    fn record(&self, decision: CheckoutDecision<'_>);
}

/// Observer that ignores every decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CheckoutObserver for NoopObserver {
    fn record(&self, _decision: CheckoutDecision<'_>) {}
}

/// Decide whether `request` may proceed under `flags`.
///
/// Pure; see [`CheckoutValidator::validate`] for the observed variant.
///
/// # Errors
///
/// Returns the first [`RejectionReason`] that applies.
pub fn decide(
    request: &CheckoutRequest,
    flags: &FeatureFlags,
) -> Result<OrderIntent, RejectionReason> {
    let method = &request.payment_method;

    if *method == PaymentMethod::CashOnDelivery && !flags.enable_cod {
        return Err(RejectionReason::FeatureDisabled);
    }

    match method {
        PaymentMethod::CreditCard if !request.has_card_details() => {
            return Err(RejectionReason::InvalidPaymentDetails);
        }
        PaymentMethod::CreditCard | PaymentMethod::CashOnDelivery => {}
        PaymentMethod::Other(_) => return Err(RejectionReason::UnsupportedPaymentMethod),
    }

    let payment_method_display = method
        .display_name()
        .ok_or(RejectionReason::UnsupportedPaymentMethod)?;

    Ok(OrderIntent {
        payment_method: method.clone(),
        payment_method_display,
        delivery_method: request.delivery_method.clone(),
        invoice_type: request.invoice_type.clone(),
    })
}

/// Validates checkout requests and reports each decision to an observer.
#[derive(Clone)]
pub struct CheckoutValidator {
    observer: Arc<dyn CheckoutObserver>,
}

impl Default for CheckoutValidator {
    fn default() -> Self {
        Self::new(Arc::new(NoopObserver))
    }
}

impl CheckoutValidator {
    /// Create a validator reporting to `observer`.
    #[must_use]
    pub fn new(observer: Arc<dyn CheckoutObserver>) -> Self {
        Self { observer }
    }

    /// Validate `request` against freshly loaded `flags` and the priced cart.
    ///
    /// # Errors
    ///
    /// Returns the first [`RejectionReason`] that applies.
    pub fn validate(
        &self,
        request: &CheckoutRequest,
        flags: &FeatureFlags,
        cart: &CartSnapshot,
    ) -> Result<OrderIntent, RejectionReason> {
        let result = decide(request, flags);

        let method = &request.payment_method;
        self.observer.record(match &result {
            Ok(_) => CheckoutDecision::Accepted {
                method,
                total: cart.total(),
            },
            Err(reason) => CheckoutDecision::Rejected {
                method,
                reason: *reason,
            },
        });

        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use proptest::prelude::*;

    use super::*;
    use crate::pricing::compute_totals;
    use crate::types::LineItem;

    fn cod_on() -> FeatureFlags {
        FeatureFlags {
            enable_cod: true,
            ..FeatureFlags::default()
        }
    }

    fn card_request() -> CheckoutRequest {
        CheckoutRequest::new(PaymentMethod::CreditCard).with_card(
            "4111-1111-1111-1111",
            "12/30",
            "123",
        )
    }

    fn cart() -> CartSnapshot {
        compute_totals(&[LineItem::new("Sample Item", Price::new(170), 1).unwrap()])
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl CheckoutObserver for Recorder {
        fn record(&self, decision: CheckoutDecision<'_>) {
            let entry = match decision {
                CheckoutDecision::Accepted { method, total } => format!("ok:{method}:{total}"),
                CheckoutDecision::Rejected { method, reason } => {
                    format!("err:{method}:{}", reason.code())
                }
            };
            self.0.lock().unwrap().push(entry);
        }
    }

    #[test]
    fn test_cod_rejected_when_flag_off() {
        let request = CheckoutRequest::new(PaymentMethod::CashOnDelivery);
        assert_eq!(
            decide(&request, &FeatureFlags::default()),
            Err(RejectionReason::FeatureDisabled)
        );
    }

    #[test]
    fn test_cod_accepted_when_flag_on() {
        let request = CheckoutRequest::new(PaymentMethod::CashOnDelivery);
        let intent = decide(&request, &cod_on()).unwrap();

        assert_eq!(intent.payment_method_display, "Cash on Delivery");
        assert_eq!(intent.delivery_method, DEFAULT_DELIVERY_METHOD);
        assert_eq!(intent.invoice_type, DEFAULT_INVOICE_TYPE);
    }

    #[test]
    fn test_credit_card_with_all_fields_accepted() {
        let intent = decide(&card_request(), &FeatureFlags::default()).unwrap();
        assert_eq!(intent.payment_method_display, "Credit Card");
        assert_eq!(intent.payment_method, PaymentMethod::CreditCard);
    }

    #[test]
    fn test_credit_card_missing_field_rejected() {
        let mut request = card_request();
        request.cvv = None;
        assert_eq!(
            decide(&request, &cod_on()),
            Err(RejectionReason::InvalidPaymentDetails)
        );
    }

    #[test]
    fn test_credit_card_blank_field_rejected() {
        let mut request = card_request();
        request.expiry_date = Some("   ".to_string());
        assert_eq!(
            decide(&request, &FeatureFlags::default()),
            Err(RejectionReason::InvalidPaymentDetails)
        );
    }

    #[test]
    fn test_unknown_method_rejected() {
        let request = CheckoutRequest::new(PaymentMethod::from("bank_transfer")).with_card(
            "4111",
            "12/30",
            "123",
        );
        assert_eq!(
            decide(&request, &cod_on()),
            Err(RejectionReason::UnsupportedPaymentMethod)
        );
    }

    #[test]
    fn test_delivery_and_invoice_pass_through() {
        let mut request = CheckoutRequest::new(PaymentMethod::CashOnDelivery);
        request.delivery_method = "store_pickup".to_string();
        request.invoice_type = "paper".to_string();

        let intent = decide(&request, &cod_on()).unwrap();
        assert_eq!(intent.delivery_method, "store_pickup");
        assert_eq!(intent.invoice_type, "paper");
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(RejectionReason::FeatureDisabled.code(), "FEATURE_DISABLED");
        assert_eq!(
            RejectionReason::InvalidPaymentDetails.code(),
            "INVALID_PAYMENT_DETAILS"
        );
        assert_eq!(
            RejectionReason::UnsupportedPaymentMethod.code(),
            "UNSUPPORTED_PAYMENT_METHOD"
        );
    }

    #[test]
    fn test_validator_reports_decisions() {
        let recorder = Arc::new(Recorder::default());
        let validator = CheckoutValidator::new(recorder.clone());
        let cart = cart();

        let _ = validator.validate(&card_request(), &FeatureFlags::default(), &cart);
        let _ = validator.validate(
            &CheckoutRequest::new(PaymentMethod::CashOnDelivery),
            &FeatureFlags::default(),
            &cart,
        );

        let entries = recorder.0.lock().unwrap().clone();
        assert_eq!(
            entries,
            vec![
                "ok:credit_card:230".to_string(),
                "err:cod:FEATURE_DISABLED".to_string()
            ]
        );
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: CheckoutRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.payment_method, PaymentMethod::CreditCard);
        assert_eq!(request.delivery_method, DEFAULT_DELIVERY_METHOD);
        assert_eq!(request.invoice_type, DEFAULT_INVOICE_TYPE);
        assert!(request.card_number.is_none());
    }

    #[test]
    fn test_debug_redacts_card_fields() {
        let output = format!("{:?}", card_request());
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("4111"));
        assert!(!output.contains("123\""));
    }

    fn arb_field() -> impl Strategy<Value = Option<String>> {
        prop_oneof![Just(None), "[ 0-9/-]{0,20}".prop_map(Some)]
    }

    proptest! {
        #[test]
        fn prop_cod_off_always_feature_disabled(
            card in arb_field(),
            expiry in arb_field(),
            cvv in arb_field(),
            delivery in "[a-z_]{0,12}",
            nudge in any::<bool>(),
        ) {
            let request = CheckoutRequest {
                payment_method: PaymentMethod::CashOnDelivery,
                card_number: card,
                expiry_date: expiry,
                cvv,
                delivery_method: delivery,
                invoice_type: DEFAULT_INVOICE_TYPE.to_string(),
            };
            let flags = FeatureFlags { enable_cod: false, enable_free_shipping_nudge: nudge };
            prop_assert_eq!(decide(&request, &flags), Err(RejectionReason::FeatureDisabled));
        }

        #[test]
        fn prop_missing_card_field_always_invalid(
            missing in 0usize..3,
            blank in prop_oneof![
                Just(None),
                Just(Some(String::new())),
                Just(Some("  ".to_string())),
            ],
            cod in any::<bool>(),
        ) {
            let mut request = card_request();
            match missing {
                0 => request.card_number = blank,
                1 => request.expiry_date = blank,
                _ => request.cvv = blank,
            }
            let flags = FeatureFlags { enable_cod: cod, ..FeatureFlags::default() };
            prop_assert_eq!(decide(&request, &flags), Err(RejectionReason::InvalidPaymentDetails));
        }
    }
}
