//! Price calculator widget
//!
//! Looks up the base price for the selected property and cleaning type.
//! The lookup is total over both enumerations, so quoting cannot fail.
//! The optional square-meter figure is captured and echoed into the quote
//! label but does not enter the price.

use clean_hurghada_config::{areas, CleaningType, PricingConfig, PropertyType};
use clean_hurghada_core::Quote;

/// Calculator state
#[derive(Debug, Clone)]
pub struct PriceCalculator {
    pricing: PricingConfig,
    /// Selected property type
    pub property: PropertyType,
    /// Selected cleaning type
    pub cleaning: CleaningType,
    /// Selected service area
    pub area: String,
    /// Optional square meters, display-only
    pub square_meters: Option<u32>,
}

impl PriceCalculator {
    /// Create a calculator with default selections
    pub fn new(pricing: PricingConfig) -> Self {
        Self {
            pricing,
            property: PropertyType::default(),
            cleaning: CleaningType::default(),
            area: areas::default_area().to_string(),
            square_meters: None,
        }
    }

    /// Select a property type
    pub fn select_property(&mut self, property: PropertyType) {
        self.property = property;
    }

    /// Select a cleaning type
    pub fn select_cleaning(&mut self, cleaning: CleaningType) {
        self.cleaning = cleaning;
    }

    /// Select a service area
    pub fn select_area(&mut self, area: impl Into<String>) {
        self.area = area.into();
    }

    /// Set the optional square-meter figure
    pub fn set_square_meters(&mut self, square_meters: Option<u32>) {
        self.square_meters = square_meters;
    }

    /// Current base price in EGP
    pub fn price(&self) -> u32 {
        self.pricing.base_price(self.property, self.cleaning)
    }

    /// Produce the quote for the current selections
    pub fn quote(&self) -> Quote {
        let details = match self.square_meters {
            Some(sqm) => format!(
                "{} - {} ({} m²)",
                self.property.label(),
                self.cleaning.label(),
                sqm
            ),
            None => format!("{} - {}", self.property.label(), self.cleaning.label()),
        };

        Quote::new(self.price(), details, self.area.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> PriceCalculator {
        PriceCalculator::new(PricingConfig::default())
    }

    #[test]
    fn test_defaults() {
        let calc = calculator();
        assert_eq!(calc.property, PropertyType::OneBed);
        assert_eq!(calc.cleaning, CleaningType::Standard);
        assert_eq!(calc.area, "El Kawther");
        assert_eq!(calc.price(), 1000);
    }

    #[test]
    fn test_every_selection_has_a_price() {
        let mut calc = calculator();
        for property in PropertyType::all() {
            for cleaning in CleaningType::all() {
                calc.select_property(*property);
                calc.select_cleaning(*cleaning);
                assert_eq!(
                    calc.price(),
                    PricingConfig::default().base_price(*property, *cleaning)
                );
            }
        }
    }

    #[test]
    fn test_quote_label() {
        let mut calc = calculator();
        calc.select_property(PropertyType::TwoBed);
        calc.select_cleaning(CleaningType::Deep);
        calc.select_area("Sahl Hasheesh");

        let quote = calc.quote();
        assert_eq!(quote.price, 1500);
        assert_eq!(quote.details, "2 Bedrooms - Deep Clean");
        assert_eq!(quote.area, "Sahl Hasheesh");
    }

    #[test]
    fn test_square_meters_labelled_but_not_priced() {
        let mut calc = calculator();
        let base = calc.price();

        calc.set_square_meters(Some(90));
        assert_eq!(calc.price(), base);
        assert_eq!(calc.quote().details, "1 Bedroom - Standard (90 m²)");
    }
}
