//! Conversational agent for the cleaning service
//!
//! Features:
//! - Conversation controller owning the transcript and the single active
//!   widget slot
//! - Price calculator over the static pricing matrix
//! - Booking flow as an explicit three-state machine
//! - Post-service rating flow
//! - Routing of free-text and image input to the chat model capability

pub mod booking;
pub mod calculator;
pub mod controller;
pub mod rating;

pub use booking::{BookingDetailsForm, BookingFlow, BookingState, PaymentSummary, ValidationError};
pub use calculator::PriceCalculator;
pub use controller::{
    ActiveWidget, ConversationController, ConversationEvent, QuickAction, WidgetKind,
};
pub use rating::RatingFlow;

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("No {0} widget is open")]
    NoActiveWidget(&'static str),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation failed: {}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Core(#[from] clean_hurghada_core::Error),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
