//! Chat model trait
//!
//! The generative backend is opaque to the rest of the system: a prompt
//! goes in, text comes out. Vision-capable completion takes an image
//! alongside the instruction text.

use async_trait::async_trait;

use crate::message::ImageAttachment;
use crate::Result;

/// Generative chat model interface
///
/// Implementations:
/// - `GeminiBackend` - Google Gemini `generateContent` API
///
/// # Example
///
/// ```ignore
/// let model: Arc<dyn ChatModel> = Arc::new(GeminiBackend::new(config)?);
/// let reply = model.complete("How do I remove a coffee stain?").await?;
/// ```
#[async_trait]
pub trait ChatModel: Send + Sync + 'static {
    /// Generate a text completion for a free-text prompt
    ///
    /// The implementation applies the fixed system instruction; callers
    /// pass only the user's text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Analyze an image with accompanying instruction text
    async fn analyze_image(&self, image: &ImageAttachment, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable and configured
    async fn is_available(&self) -> bool;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockModel;

    #[async_trait]
    impl ChatModel for MockModel {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok("Mock reply".to_string())
        }

        async fn analyze_image(&self, _image: &ImageAttachment, _prompt: &str) -> Result<String> {
            Ok("Looks like a sand stain".to_string())
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }
    }

    #[tokio::test]
    async fn test_mock_model() {
        let model = MockModel;
        assert!(model.is_available().await);
        assert_eq!(model.complete("hi").await.unwrap(), "Mock reply");

        let image = ImageAttachment::jpeg("AAAA");
        let analysis = model.analyze_image(&image, "what is this?").await.unwrap();
        assert!(analysis.contains("sand"));
    }
}
