//! Core traits and types for the Clean Hurghada chat agent
//!
//! This crate provides foundational types used across all other crates:
//! - Language selection (Arabic/English) and text direction
//! - Chat message and transcript types
//! - Booking domain types (drafts, quotes, crew preference)
//! - Capability traits for pluggable backends (chat model, payment gateway)
//! - Error types

pub mod booking;
pub mod error;
pub mod language;
pub mod message;
pub mod rating;
pub mod traits;

pub use booking::{BookingDraft, CrewPreference, Quote};
pub use error::{Error, Result};
pub use language::{Direction, Language};
pub use message::{ChatMessage, ImageAttachment, MessageRole};
pub use rating::RatingSubmission;

pub use traits::{
    // Chat model
    ChatModel,
    // Payment
    BillingDetails, PaymentGateway, PaymentOutcome, PaymentRequest, PendingPayment,
};
