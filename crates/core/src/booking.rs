//! Booking domain types
//!
//! A `Quote` comes out of the price calculator and seeds a `BookingDraft`,
//! which the booking flow fills in field by field. Drafts are discarded
//! when the flow closes, never persisted.

use serde::{Deserialize, Serialize};

/// Customer's choice of cleaning crew
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrewPreference {
    /// Any professional crew
    #[default]
    Any,
    /// Female cleaners (housekeeping)
    Female,
    /// Male cleaners (heavy duty)
    Male,
}

impl CrewPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrewPreference::Any => "any",
            CrewPreference::Female => "female",
            CrewPreference::Male => "male",
        }
    }

    /// Parse from string (case-insensitive); unknown values mean "any"
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "female" => CrewPreference::Female,
            "male" => CrewPreference::Male,
            _ => CrewPreference::Any,
        }
    }

    pub fn all() -> &'static [CrewPreference] {
        &[
            CrewPreference::Any,
            CrewPreference::Female,
            CrewPreference::Male,
        ]
    }
}

impl std::fmt::Display for CrewPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A quote produced by the price calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Base price in EGP, before the service fee
    pub price: u32,
    /// Human-readable service description, e.g. "1 Bedroom - Deep Clean (90 m²)"
    pub details: String,
    /// Selected service area (may be the "Other" sentinel)
    pub area: String,
}

impl Quote {
    pub fn new(price: u32, details: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            price,
            details: details.into(),
            area: area.into(),
        }
    }
}

/// Booking details collected from the customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BookingDraft {
    /// Customer name
    pub name: String,
    /// WhatsApp phone number
    pub phone: String,
    /// Service area (resolved: enumerated choice or free text)
    pub area: String,
    /// Preferred date (YYYY-MM-DD)
    pub date: String,
    /// Service description carried over from the quote
    pub details: String,
    /// Base price in EGP, before the service fee
    pub price: u32,
    /// Crew preference
    pub crew_preference: CrewPreference,
}

impl BookingDraft {
    /// Seed a draft from a calculator quote
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            details: quote.details.clone(),
            price: quote.price,
            area: quote.area.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crew_preference_parsing() {
        assert_eq!(CrewPreference::from_str_loose("Female"), CrewPreference::Female);
        assert_eq!(CrewPreference::from_str_loose("male"), CrewPreference::Male);
        assert_eq!(CrewPreference::from_str_loose("whatever"), CrewPreference::Any);
        assert_eq!(CrewPreference::default(), CrewPreference::Any);
    }

    #[test]
    fn test_draft_from_quote() {
        let quote = Quote::new(1200, "2 Bedrooms - Standard", "El Kawther");
        let draft = BookingDraft::from_quote(&quote);
        assert_eq!(draft.price, 1200);
        assert_eq!(draft.area, "El Kawther");
        assert!(draft.name.is_empty());
        assert_eq!(draft.crew_preference, CrewPreference::Any);
    }
}
