//! Booking flow
//!
//! A three-state wizard: collect details, review payment, done. The
//! payment step only ever completes on an outcome the provider itself
//! confirmed; an abandoned or dismissed checkout leaves the flow in
//! review with the failure surfaced to the caller.

use serde::{Deserialize, Serialize};

use clean_hurghada_config::{areas, UiText};
use clean_hurghada_core::{
    BillingDetails, BookingDraft, CrewPreference, PaymentGateway, PaymentOutcome, PaymentRequest,
    PendingPayment, Quote,
};

use crate::AgentError;

/// Booking wizard states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingState {
    /// Collecting name, phone, area, date and crew preference
    #[default]
    CollectingDetails,
    /// Read-only summary with the service fee applied; awaiting payment
    ReviewingPayment,
    /// Payment confirmed by the provider
    Succeeded,
}

impl BookingState {
    /// Allowed transitions from the current state
    pub fn allowed_transitions(&self) -> &'static [BookingState] {
        match self {
            BookingState::CollectingDetails => &[BookingState::ReviewingPayment],
            BookingState::ReviewingPayment => {
                &[BookingState::CollectingDetails, BookingState::Succeeded]
            }
            BookingState::Succeeded => &[],
        }
    }

    /// Check if a transition to the target state is allowed
    pub fn can_transition_to(&self, target: BookingState) -> bool {
        self.allowed_transitions().contains(&target)
    }
}

/// Per-field validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    MissingName,
    MissingPhone,
    MissingDate,
    MissingArea,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ValidationError::MissingName => "name is required",
            ValidationError::MissingPhone => "phone is required",
            ValidationError::MissingDate => "date is required",
            ValidationError::MissingArea => "area is required",
        };
        write!(f, "{}", text)
    }
}

/// Details submitted from the booking form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingDetailsForm {
    pub name: String,
    pub phone: String,
    /// Area selection from the enumerated list (possibly "Other")
    pub area: String,
    /// Free-text area, required when the selection is "Other"
    #[serde(default)]
    pub custom_area: String,
    /// Preferred date (YYYY-MM-DD)
    pub date: String,
    #[serde(default)]
    pub crew_preference: CrewPreference,
}

/// Read-only summary rendered at the review step
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummary {
    pub details: String,
    pub area: String,
    pub date: String,
    pub crew: &'static str,
    /// Total in EGP with the service fee applied
    pub total: u32,
}

/// The booking wizard
#[derive(Debug, Clone)]
pub struct BookingFlow {
    state: BookingState,
    draft: BookingDraft,
    /// Whether the area came in as the "Other" sentinel (free text required)
    custom_area: bool,
    service_fee_percent: f64,
    pending: Option<PendingPayment>,
}

impl BookingFlow {
    /// Start a booking from a calculator quote
    pub fn from_quote(quote: &Quote, service_fee_percent: f64) -> Self {
        let custom_area = areas::is_other(&quote.area);
        let mut draft = BookingDraft::from_quote(quote);
        if custom_area {
            // The sentinel is not an area; the customer types one in.
            draft.area.clear();
        } else if draft.area.is_empty() {
            draft.area = areas::default_area().to_string();
        }

        Self {
            state: BookingState::CollectingDetails,
            draft,
            custom_area,
            service_fee_percent,
            pending: None,
        }
    }

    /// Start a booking without a quote ("Book Now")
    pub fn direct(price: u32, details: impl Into<String>, service_fee_percent: f64) -> Self {
        Self::from_quote(
            &Quote::new(price, details, areas::default_area()),
            service_fee_percent,
        )
    }

    /// Current state
    pub fn state(&self) -> BookingState {
        self.state
    }

    /// Collected details
    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Whether the area input is free text
    pub fn requires_custom_area(&self) -> bool {
        self.custom_area
    }

    /// Provider order reference once payment has been initiated
    pub fn pending_order(&self) -> Option<&PendingPayment> {
        self.pending.as_ref()
    }

    /// Total payable in EGP: base price plus the service fee, rounded
    pub fn total(&self) -> u32 {
        (self.draft.price as f64 * (1.0 + self.service_fee_percent / 100.0)).round() as u32
    }

    /// Submit the details form
    ///
    /// Rejected (no transition) when any required field is empty;
    /// otherwise stores the details and moves to the review step.
    pub fn submit_details(&mut self, form: BookingDetailsForm) -> Result<(), AgentError> {
        if self.state != BookingState::CollectingDetails {
            return Err(AgentError::InvalidState(format!(
                "cannot submit details in state {:?}",
                self.state
            )));
        }

        // The form is authoritative: choosing "Other" (or clearing the
        // selection) means the free-text field carries the area.
        let selecting_other = areas::is_other(&form.area) || form.area.trim().is_empty();
        let area = if selecting_other {
            form.custom_area.trim().to_string()
        } else {
            form.area.trim().to_string()
        };

        let mut errors = Vec::new();
        if form.name.trim().is_empty() {
            errors.push(ValidationError::MissingName);
        }
        if form.phone.trim().is_empty() {
            errors.push(ValidationError::MissingPhone);
        }
        if form.date.trim().is_empty() {
            errors.push(ValidationError::MissingDate);
        }
        if area.is_empty() {
            errors.push(ValidationError::MissingArea);
        }
        if !errors.is_empty() {
            return Err(AgentError::Validation(errors));
        }

        self.custom_area = selecting_other;
        self.draft.name = form.name.trim().to_string();
        self.draft.phone = form.phone.trim().to_string();
        self.draft.area = area;
        self.draft.date = form.date.trim().to_string();
        self.draft.crew_preference = form.crew_preference;

        self.state = BookingState::ReviewingPayment;
        Ok(())
    }

    /// Return from the review step to the form, keeping every entered field
    pub fn back(&mut self) -> Result<(), AgentError> {
        if !self.state.can_transition_to(BookingState::CollectingDetails) {
            return Err(AgentError::InvalidState(format!(
                "cannot go back from state {:?}",
                self.state
            )));
        }
        self.state = BookingState::CollectingDetails;
        Ok(())
    }

    /// Summary for the review step
    pub fn summary(&self, text: &UiText) -> Option<PaymentSummary> {
        if self.state != BookingState::ReviewingPayment {
            return None;
        }
        Some(PaymentSummary {
            details: self.draft.details.clone(),
            area: self.draft.area.clone(),
            date: self.draft.date.clone(),
            crew: text.crew_label(self.draft.crew_preference),
            total: self.total(),
        })
    }

    /// Start the payment with the gateway, keeping the order reference
    ///
    /// Stays in the review step; confirmation happens separately.
    pub async fn initiate_payment(
        &mut self,
        gateway: &dyn PaymentGateway,
    ) -> Result<PendingPayment, AgentError> {
        if self.state != BookingState::ReviewingPayment {
            return Err(AgentError::InvalidState(format!(
                "cannot pay in state {:?}",
                self.state
            )));
        }

        let billing =
            BillingDetails::new(&self.draft.name, &self.draft.phone, &self.draft.area);
        let request = PaymentRequest::egp(self.total(), billing);

        let pending = gateway.initiate(request).await?;
        self.pending = Some(pending.clone());
        Ok(pending)
    }

    /// Poll the gateway for the authoritative outcome
    ///
    /// Transitions to `Succeeded` only on a provider-confirmed payment.
    /// Everything else leaves the flow in the review step so the customer
    /// can retry; the outcome is returned for the caller to surface.
    pub async fn confirm_payment(
        &mut self,
        gateway: &dyn PaymentGateway,
    ) -> Result<PaymentOutcome, AgentError> {
        if self.state != BookingState::ReviewingPayment {
            return Err(AgentError::InvalidState(format!(
                "cannot confirm payment in state {:?}",
                self.state
            )));
        }
        let pending = self.pending.as_ref().ok_or_else(|| {
            AgentError::InvalidState("no payment has been initiated".to_string())
        })?;

        let outcome = gateway.confirm(&pending.order_id).await?;
        if outcome.is_confirmed() {
            self.state = BookingState::Succeeded;
            tracing::info!(order_id = %pending.order_id, "Booking confirmed");
        }
        Ok(outcome)
    }
}
