//! Capability traits for pluggable backends

pub mod llm;
pub mod payment;

pub use llm::ChatModel;
pub use payment::{
    BillingDetails, PaymentGateway, PaymentOutcome, PaymentRequest, PendingPayment,
};
