//! In-process checkout counters.
//!
//! [`CheckoutMetrics`] is plugged into the validator as its observer. Each
//! decision bumps a counter and emits a structured log line; nothing is
//! exported over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use toggle_checkout_core::{CheckoutDecision, CheckoutObserver, RejectionReason};

/// Counters for checkout decisions.
#[derive(Debug, Default)]
pub struct CheckoutMetrics {
    accepted: AtomicU64,
    feature_disabled: AtomicU64,
    invalid_payment_details: AtomicU64,
    unsupported_payment_method: AtomicU64,
    sales_total: AtomicU64,
}

/// Point-in-time copy of [`CheckoutMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub accepted: u64,
    pub rejected: u64,
    pub feature_disabled: u64,
    pub sales_total: u64,
}

impl CheckoutMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn rejection_counter(&self, reason: RejectionReason) -> &AtomicU64 {
        match reason {
            RejectionReason::FeatureDisabled => &self.feature_disabled,
            RejectionReason::InvalidPaymentDetails => &self.invalid_payment_details,
            RejectionReason::UnsupportedPaymentMethod => &self.unsupported_payment_method,
        }
    }

    /// Read all counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let feature_disabled = self.feature_disabled.load(Ordering::Relaxed);
        MetricsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: feature_disabled
                + self.invalid_payment_details.load(Ordering::Relaxed)
                + self.unsupported_payment_method.load(Ordering::Relaxed),
            feature_disabled,
            sales_total: self.sales_total.load(Ordering::Relaxed),
        }
    }
}

impl CheckoutObserver for CheckoutMetrics {
    fn record(&self, decision: CheckoutDecision<'_>) {
        match decision {
            CheckoutDecision::Accepted { method, total } => {
                self.accepted.fetch_add(1, Ordering::Relaxed);
                self.sales_total.fetch_add(total.amount(), Ordering::Relaxed);
                tracing::info!(
                    payment_method = %method,
                    total = %total,
                    "checkout accepted"
                );
            }
            CheckoutDecision::Rejected { method, reason } => {
                self.rejection_counter(reason).fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    payment_method = %method,
                    error_code = reason.code(),
                    "checkout rejected"
                );
            }
        }
    }
}
