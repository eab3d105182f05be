//! Cleaning service pricing configuration
//!
//! Base prices are a total lookup over (property type, cleaning type), so
//! quoting can never fail. A fixed service fee is applied once, at
//! payment-review time.

use serde::{Deserialize, Serialize};

/// Property categories the service cleans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Studio,
    #[default]
    OneBed,
    TwoBed,
    Villa,
}

impl PropertyType {
    /// Catalogue label shown to customers
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Studio => "Studio",
            PropertyType::OneBed => "1 Bedroom",
            PropertyType::TwoBed => "2 Bedrooms",
            PropertyType::Villa => "Villa / 3+ Beds",
        }
    }

    /// Parse from a catalogue label or short code
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "studio" => Some(PropertyType::Studio),
            "one_bed" | "1 bedroom" | "1-bed" | "1bed" => Some(PropertyType::OneBed),
            "two_bed" | "2 bedrooms" | "2-bed" | "2bed" => Some(PropertyType::TwoBed),
            "villa" | "villa / 3+ beds" => Some(PropertyType::Villa),
            _ => None,
        }
    }

    pub fn all() -> &'static [PropertyType] {
        &[
            PropertyType::Studio,
            PropertyType::OneBed,
            PropertyType::TwoBed,
            PropertyType::Villa,
        ]
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Cleaning service variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CleaningType {
    #[default]
    Standard,
    Deep,
    AirbnbTurnover,
    AfterRenovation,
}

impl CleaningType {
    /// Catalogue label shown to customers
    pub fn label(&self) -> &'static str {
        match self {
            CleaningType::Standard => "Standard",
            CleaningType::Deep => "Deep Clean",
            CleaningType::AirbnbTurnover => "Airbnb Turnover",
            CleaningType::AfterRenovation => "After Renovation",
        }
    }

    /// Parse from a catalogue label or short code
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Some(CleaningType::Standard),
            "deep" | "deep clean" => Some(CleaningType::Deep),
            "airbnb_turnover" | "airbnb turnover" | "airbnb" => Some(CleaningType::AirbnbTurnover),
            "after_renovation" | "after renovation" | "renovation" => {
                Some(CleaningType::AfterRenovation)
            }
            _ => None,
        }
    }

    pub fn all() -> &'static [CleaningType] {
        &[
            CleaningType::Standard,
            CleaningType::Deep,
            CleaningType::AirbnbTurnover,
            CleaningType::AfterRenovation,
        ]
    }
}

impl std::fmt::Display for CleaningType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Base prices for one property type, in EGP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningRates {
    pub standard: u32,
    pub deep: u32,
    pub airbnb_turnover: u32,
    pub after_renovation: u32,
}

impl CleaningRates {
    /// Look up the rate for a cleaning type
    pub fn rate(&self, cleaning: CleaningType) -> u32 {
        match cleaning {
            CleaningType::Standard => self.standard,
            CleaningType::Deep => self.deep,
            CleaningType::AirbnbTurnover => self.airbnb_turnover,
            CleaningType::AfterRenovation => self.after_renovation,
        }
    }
}

/// Pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Studio rates
    #[serde(default = "default_studio_rates")]
    pub studio: CleaningRates,

    /// 1-bedroom rates
    #[serde(default = "default_one_bed_rates")]
    pub one_bed: CleaningRates,

    /// 2-bedroom rates
    #[serde(default = "default_two_bed_rates")]
    pub two_bed: CleaningRates,

    /// Villa rates ("starts from" pricing)
    #[serde(default = "default_villa_rates")]
    pub villa: CleaningRates,

    /// Service fee applied at payment time (%)
    #[serde(default = "default_service_fee")]
    pub service_fee_percent: f64,
}

// Default values (EGP)
fn default_studio_rates() -> CleaningRates {
    CleaningRates {
        standard: 700,
        deep: 1000,
        airbnb_turnover: 1000,
        after_renovation: 1500,
    }
}

fn default_one_bed_rates() -> CleaningRates {
    CleaningRates {
        standard: 1000,
        deep: 1200,
        airbnb_turnover: 1500,
        after_renovation: 2000,
    }
}

fn default_two_bed_rates() -> CleaningRates {
    CleaningRates {
        standard: 1200,
        deep: 1500,
        airbnb_turnover: 2000,
        after_renovation: 2500,
    }
}

fn default_villa_rates() -> CleaningRates {
    CleaningRates {
        standard: 1500,
        deep: 2500,
        airbnb_turnover: 3000,
        after_renovation: 5000,
    }
}

fn default_service_fee() -> f64 {
    15.0 // %
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            studio: default_studio_rates(),
            one_bed: default_one_bed_rates(),
            two_bed: default_two_bed_rates(),
            villa: default_villa_rates(),
            service_fee_percent: default_service_fee(),
        }
    }
}

impl PricingConfig {
    /// Get the rate table for a property type
    pub fn rates(&self, property: PropertyType) -> &CleaningRates {
        match property {
            PropertyType::Studio => &self.studio,
            PropertyType::OneBed => &self.one_bed,
            PropertyType::TwoBed => &self.two_bed,
            PropertyType::Villa => &self.villa,
        }
    }

    /// Base price for a (property, cleaning) pair, in EGP
    ///
    /// Total over both enumerations; cannot fail.
    pub fn base_price(&self, property: PropertyType, cleaning: CleaningType) -> u32 {
        self.rates(property).rate(cleaning)
    }

    /// Apply the service fee to a base price, rounding to the nearest EGP
    pub fn apply_service_fee(&self, base_price: u32) -> u32 {
        (base_price as f64 * (1.0 + self.service_fee_percent / 100.0)).round() as u32
    }
}
