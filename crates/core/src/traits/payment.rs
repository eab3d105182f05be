//! Payment gateway trait
//!
//! The provider flow is multi-step (create order, obtain a payment token,
//! hand the customer a hosted checkout surface) and success is only ever
//! established by an authoritative status check against the provider.
//! Dismissal of the checkout surface is not an outcome.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Billing details forwarded to the payment provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    /// Customer name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// City / service area
    pub city: String,
}

impl BillingDetails {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            city: city.into(),
        }
    }
}

/// A payment to be collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Amount in minor currency units (piastres for EGP)
    pub amount_cents: u64,
    /// ISO currency code
    pub currency: String,
    /// Billing details
    pub billing: BillingDetails,
}

impl PaymentRequest {
    /// Build a request from a whole-unit EGP amount
    pub fn egp(amount: u32, billing: BillingDetails) -> Self {
        Self {
            amount_cents: amount as u64 * 100,
            currency: "EGP".to_string(),
            billing,
        }
    }
}

/// A payment that has been initiated but not yet confirmed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingPayment {
    /// Provider-side order reference
    pub order_id: String,
    /// Hosted checkout URL to present to the customer
    pub checkout_url: String,
}

/// Authoritative payment outcome reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentOutcome {
    /// Provider confirmed the order as paid
    Confirmed {
        /// Provider-side transaction reference
        transaction_id: String,
    },
    /// Not yet paid (checkout open, abandoned, or still processing)
    Pending,
    /// Provider explicitly refused the payment
    Declined {
        reason: String,
    },
}

impl PaymentOutcome {
    /// True only for a provider-confirmed payment
    pub fn is_confirmed(&self) -> bool {
        matches!(self, PaymentOutcome::Confirmed { .. })
    }
}

/// Payment gateway interface
///
/// `initiate` runs the provider's order/token steps strictly in sequence
/// and yields a checkout URL; `confirm` polls the provider for the
/// authoritative order status.
#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Create an order and obtain a hosted checkout URL
    async fn initiate(&self, request: PaymentRequest) -> Result<PendingPayment>;

    /// Query the authoritative status of a previously created order
    async fn confirm(&self, order_id: &str) -> Result<PaymentOutcome>;
}
