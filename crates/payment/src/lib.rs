//! Payment gateway integration
//!
//! Implements the `PaymentGateway` capability against the Paymob Accept
//! API: create order, obtain a payment key, hand out the hosted checkout
//! URL, and poll the order for its authoritative payment status.

pub mod paymob;

pub use paymob::{PaymobClient, PaymobConfig};

use thiserror::Error;

/// Payment errors
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment configuration error: {0}")]
    Configuration(String),

    #[error("Provider error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PaymentError::Timeout
        } else {
            PaymentError::Network(err.to_string())
        }
    }
}

impl From<PaymentError> for clean_hurghada_core::Error {
    fn from(err: PaymentError) -> Self {
        clean_hurghada_core::Error::Payment(err.to_string())
    }
}
