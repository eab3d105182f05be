//! Gemini backend
//!
//! Calls the `generateContent` endpoint with the fixed system instruction;
//! image analysis goes to the vision-capable model with an inline-data
//! part. Requests are plain request/response, no streaming.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use clean_hurghada_config::{GeminiSettings, PricingConfig};
use clean_hurghada_core::{ChatModel, ImageAttachment};

use crate::LlmError;

/// Configuration for the Gemini backend
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key (from GEMINI_API_KEY or settings)
    pub api_key: String,
    /// Text model id
    pub model: String,
    /// Vision-capable model id
    pub vision_model: String,
    /// API endpoint (for testing or proxy)
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// Fixed system instruction applied to every completion
    pub system_instruction: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::from_settings(&GeminiSettings::default(), &PricingConfig::default())
    }
}

impl GeminiConfig {
    /// Build the config from loaded settings
    pub fn from_settings(settings: &GeminiSettings, pricing: &PricingConfig) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            vision_model: settings.vision_model.clone(),
            endpoint: settings.endpoint.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            system_instruction: clean_hurghada_config::system_instruction(pricing),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the text model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Gemini chat model backend
#[derive(Clone)]
pub struct GeminiBackend {
    config: GeminiConfig,
    client: Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    ///
    /// A missing API key is not an error here: the rest of the system can
    /// run without the chat capability, and the failure surfaces as the
    /// localized apology when a completion is actually requested.
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint, model
        )
    }

    async fn generate(&self, model: &str, parts: Vec<Part>) -> Result<String, LlmError> {
        if self.config.api_key.is_empty() {
            return Err(LlmError::Configuration(
                "GEMINI_API_KEY not set. Set it via environment or config.".to_string(),
            ));
        }

        let request = GenerateContentRequest {
            system_instruction: Some(SystemInstruction {
                parts: vec![Part::text(&self.config.system_instruction)],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
        };

        let response = self
            .client
            .post(self.api_url(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::InvalidResponse(
                "Response contained no text candidates".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl ChatModel for GeminiBackend {
    async fn complete(&self, prompt: &str) -> clean_hurghada_core::Result<String> {
        let text = self
            .generate(&self.config.model, vec![Part::text(prompt)])
            .await
            .map_err(|e| {
                tracing::warn!("Gemini text completion failed: {}", e);
                e
            })?;
        Ok(text)
    }

    async fn analyze_image(
        &self,
        image: &ImageAttachment,
        prompt: &str,
    ) -> clean_hurghada_core::Result<String> {
        let parts = vec![
            Part::inline_data(&image.mime_type, &image.data),
            Part::text(prompt),
        ];
        let text = self
            .generate(&self.config.vision_model, parts)
            .await
            .map_err(|e| {
                tracing::warn!("Gemini vision completion failed: {}", e);
                e
            })?;
        Ok(text)
    }

    async fn is_available(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(endpoint: &str) -> GeminiConfig {
        GeminiConfig::default()
            .with_api_key("test-key")
            .with_endpoint(endpoint)
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_at_call_time() {
        let config = GeminiConfig::default().with_api_key("");
        let backend = GeminiBackend::new(config).unwrap();
        assert!(!backend.is_available().await);

        let err = backend.complete("hello").await.err().unwrap();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_complete_parses_candidate_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "How much for a studio?"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{"text": "A standard studio clean is 700 EGP."}]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(test_config(&server.uri())).unwrap();
        let reply = backend.complete("How much for a studio?").await.unwrap();
        assert_eq!(reply, "A standard studio clean is 700 EGP.");
    }

    #[tokio::test]
    async fn test_analyze_image_targets_vision_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash-image:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"parts": [
                    {"inlineData": {"mimeType": "image/jpeg", "data": "AAAA"}},
                    {"text": "What stain is this?"}
                ]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Looks like red wine; use baking soda."}]}
                }]
            })))
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(test_config(&server.uri())).unwrap();
        let image = ImageAttachment::jpeg("AAAA");
        let reply = backend
            .analyze_image(&image, "What stain is this?")
            .await
            .unwrap();
        assert!(reply.contains("baking soda"));
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(test_config(&server.uri())).unwrap();
        let err = backend.complete("hello").await.err().unwrap();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(test_config(&server.uri())).unwrap();
        assert!(backend.complete("hello").await.is_err());
    }
}
