//! Configuration management for the chat agent
//!
//! Supports loading configuration from:
//! - TOML files (`config/default.toml`, `config/{env}.toml`)
//! - Environment variables (CLEAN_HURGHADA_ prefix)
//!
//! Also home to the static business tables:
//! - Pricing matrix (property type x cleaning type)
//! - Hurghada service areas
//! - Bilingual UI string table
//! - The assistant's system instruction

pub mod areas;
pub mod locale;
pub mod pricing;
pub mod prompts;
pub mod settings;

pub use areas::{default_area, is_other, service_areas, OTHER_AREA};
pub use locale::UiText;
pub use pricing::{CleaningRates, CleaningType, PricingConfig, PropertyType};
pub use prompts::{system_instruction, DEFAULT_VISION_PROMPT};
pub use settings::{
    load_settings, GeminiSettings, PaymobSettings, RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
