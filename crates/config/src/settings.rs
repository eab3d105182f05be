//! Main settings module
//!
//! Priority: env vars > config/{env}.toml > config/default.toml > defaults.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::pricing::PricingConfig;
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Gemini chat model configuration
    #[serde(default)]
    pub gemini: GeminiSettings,

    /// Paymob payment gateway configuration
    #[serde(default)]
    pub paymob: PaymobSettings,

    /// Pricing matrix and service fee
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS origin checks
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum concurrent chat sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Seconds of inactivity before a session is evicted
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_max_sessions() -> usize {
    200
}

fn default_session_idle_secs() -> u64 {
    1800 // 30 minutes
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
            max_sessions: default_max_sessions(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// API key (from GEMINI_API_KEY)
    #[serde(default = "default_gemini_api_key")]
    pub api_key: String,

    /// Text model id
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Vision-capable model id
    #[serde(default = "default_gemini_vision_model")]
    pub vision_model: String,

    /// API endpoint (overridable for tests/proxies)
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

fn default_gemini_api_key() -> String {
    std::env::var("GEMINI_API_KEY").unwrap_or_default()
}

fn default_gemini_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_gemini_vision_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_timeout() -> u64 {
    30
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: default_gemini_api_key(),
            model: default_gemini_model(),
            vision_model: default_gemini_vision_model(),
            endpoint: default_gemini_endpoint(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

/// Paymob Accept configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymobSettings {
    /// API key (from PAYMOB_API_KEY)
    #[serde(default = "default_paymob_api_key")]
    pub api_key: String,

    /// Card/wallet integration id (from PAYMOB_INTEGRATION_ID)
    #[serde(default = "default_paymob_integration_id")]
    pub integration_id: String,

    /// API endpoint (overridable for tests)
    #[serde(default = "default_paymob_endpoint")]
    pub endpoint: String,

    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Payment key expiration in seconds
    #[serde(default = "default_payment_expiration")]
    pub expiration_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "default_paymob_timeout")]
    pub timeout_secs: u64,
}

fn default_paymob_api_key() -> String {
    std::env::var("PAYMOB_API_KEY").unwrap_or_default()
}

fn default_paymob_integration_id() -> String {
    std::env::var("PAYMOB_INTEGRATION_ID").unwrap_or_default()
}

fn default_paymob_endpoint() -> String {
    "https://accept.paymob.com".to_string()
}

fn default_currency() -> String {
    "EGP".to_string()
}

fn default_payment_expiration() -> u64 {
    3600 // 1 hour
}

fn default_paymob_timeout() -> u64 {
    30
}

impl Default for PaymobSettings {
    fn default() -> Self {
        Self {
            api_key: default_paymob_api_key(),
            integration_id: default_paymob_integration_id(),
            endpoint: default_paymob_endpoint(),
            currency: default_currency(),
            expiration_secs: default_payment_expiration(),
            timeout_secs: default_paymob_timeout(),
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if self.server.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                message: "Must allow at least 1 session".to_string(),
            });
        }

        if !(0.0..=100.0).contains(&self.pricing.service_fee_percent) {
            return Err(ConfigError::InvalidValue {
                field: "pricing.service_fee_percent".to_string(),
                message: format!(
                    "Must be between 0 and 100, got {}",
                    self.pricing.service_fee_percent
                ),
            });
        }

        // Credentials are required in production; in development a missing
        // key only degrades the affected capability at call time.
        if self.environment.is_strict() {
            if self.gemini.api_key.is_empty() {
                return Err(ConfigError::MissingField("gemini.api_key".to_string()));
            }
            if self.paymob.api_key.is_empty() || self.paymob.integration_id.is_empty() {
                return Err(ConfigError::MissingField(
                    "paymob.api_key / paymob.integration_id".to_string(),
                ));
            }
        } else {
            if self.gemini.api_key.is_empty() {
                tracing::warn!("GEMINI_API_KEY not set, chat completions will fail");
            }
            if self.paymob.api_key.is_empty() || self.paymob.integration_id.is_empty() {
                tracing::warn!("Paymob credentials not set, payments will be rejected");
            }
        }

        Ok(())
    }
}

/// Load settings from files and environment
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("CLEAN_HURGHADA")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.paymob.currency, "EGP");
        assert_eq!(settings.pricing.service_fee_percent, 15.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.pricing.service_fee_percent = 130.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_production_requires_credentials() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        settings.gemini.api_key.clear();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }
}
