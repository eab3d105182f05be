//! System instruction for the generative backend
//!
//! The assistant identity, tone, bilingual requirement and reference
//! price ranges are fixed per deployment; the price ranges are derived
//! from the live pricing table so the prompt never drifts from quotes.

use crate::pricing::{CleaningType, PricingConfig, PropertyType};

/// WhatsApp support line
pub const SUPPORT_WHATSAPP: &str = "+20 100 987 6543";
/// Support email
pub const SUPPORT_EMAIL: &str = "support@cleanhurghada.com";
/// Office address
pub const OFFICE_ADDRESS: &str = "Sheraton Road, El Kawther, Hurghada";

/// Instruction used when an image arrives without accompanying text
pub const DEFAULT_VISION_PROMPT: &str = "Analyze this image. If it is a stain or dirt in an \
    apartment, tell me how to clean it using common household items found in Egypt (Vinegar, \
    Lemon, Baking Soda). Be concise.";

/// Build the fixed system instruction for the chat model
pub fn system_instruction(pricing: &PricingConfig) -> String {
    let range = |property: PropertyType| {
        let low = pricing.base_price(property, CleaningType::Standard);
        let high = pricing.base_price(property, CleaningType::AirbnbTurnover);
        format!("~{}-{} EGP", low, high)
    };
    let villa_from = pricing.base_price(PropertyType::Villa, CleaningType::Standard);

    format!(
        "You are \"Clean Hurghada Bot\" (بوت تنظيف الغردقة), a helpful cleaning service \
assistant for Hurghada, Egypt.
Your tone is friendly, professional, and helpful. You love the Red Sea.
Languages: You speak Arabic and English fluently. Adapt to the user's language.
Services: Apartment cleaning, Villa cleaning, Airbnb Turnover, Stain removal advice.

Contact Support Details:
- 📞 WhatsApp: {whatsapp}
- 📧 Email: {email}
- 📍 Office: {office}

Prices (Reference only, guide users to the \"Calculate Price\" button for exact quotes):
- Studio: {studio}
- 1 Bed: {one_bed}
- 2 Bed: {two_bed}
- Villa: Starts at {villa_from} EGP

If the user uploads an image:
1. Analyze the stain/dirt (Is it sand? Salt? Grease? Wine?).
2. Give specific removal tips using household items (Vinegar, Soda, Lemon) available in Egypt.
3. Suggest professional cleaning if it looks too hard.

If the user wants to book, encourage them to use the \"Book Cleaning\" button.
Do not make up fake booking confirmations in text, guide them to the UI tools.
",
        whatsapp = SUPPORT_WHATSAPP,
        email = SUPPORT_EMAIL,
        office = OFFICE_ADDRESS,
        studio = range(PropertyType::Studio),
        one_bed = range(PropertyType::OneBed),
        two_bed = range(PropertyType::TwoBed),
        villa_from = villa_from,
    )
}
