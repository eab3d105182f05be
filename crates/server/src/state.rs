//! Application state
//!
//! Shared state across all handlers.

use std::sync::Arc;
use std::time::Duration;

use clean_hurghada_agent::ConversationController;
use clean_hurghada_config::Settings;
use clean_hurghada_core::{ChatModel, Language, PaymentGateway};
use clean_hurghada_llm::{GeminiBackend, GeminiConfig};
use clean_hurghada_payment::{PaymobClient, PaymobConfig};

use crate::session::{ChatSession, SessionManager};
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub settings: Arc<Settings>,
    /// Session registry
    pub sessions: Arc<SessionManager>,
    /// Chat model capability shared by all sessions
    pub chat_model: Arc<dyn ChatModel>,
    /// Payment gateway capability shared by all sessions
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Create state with explicit capability backends
    pub fn new(
        settings: Settings,
        chat_model: Arc<dyn ChatModel>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let sessions = Arc::new(SessionManager::new(
            settings.server.max_sessions,
            Duration::from_secs(settings.server.session_idle_secs),
        ));

        Self {
            settings: Arc::new(settings),
            sessions,
            chat_model,
            gateway,
        }
    }

    /// Create state with the real Gemini and Paymob backends
    pub fn from_settings(settings: Settings) -> Result<Self, ServerError> {
        let chat_model = GeminiBackend::new(GeminiConfig::from_settings(
            &settings.gemini,
            &settings.pricing,
        ))
        .map_err(|e| ServerError::Internal(e.to_string()))?;

        let gateway = PaymobClient::new(PaymobConfig::from_settings(&settings.paymob))
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(Self::new(settings, Arc::new(chat_model), Arc::new(gateway)))
    }

    /// Start a new conversation session
    pub fn new_session(&self, language: Language) -> Result<Arc<ChatSession>, ServerError> {
        let controller = ConversationController::new(
            language,
            self.settings.pricing.clone(),
            Arc::clone(&self.chat_model),
            Arc::clone(&self.gateway),
        );
        self.sessions.create(controller)
    }
}
