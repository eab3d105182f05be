//! Chat message types
//!
//! The conversation is an append-only sequence of messages. Messages are
//! immutable once appended and live only for the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Customer message
    User,
    /// Assistant reply (generated or system-injected)
    Model,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Model => "model",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An image attached to a user message (stain photos, room photos)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// Base64-encoded image bytes, without a data-URL prefix
    pub data: String,
    /// MIME type, e.g. `image/jpeg`
    pub mime_type: String,
}

impl ImageAttachment {
    /// Create an attachment from base64 data.
    ///
    /// Accepts either a bare base64 payload or a full
    /// `data:<mime>;base64,<payload>` URL; in the latter case the MIME
    /// type embedded in the URL wins.
    pub fn from_base64(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        let data = data.into();
        let mut mime_type = mime_type.into();

        let payload = match data.split_once(',') {
            Some((header, payload)) if header.starts_with("data:") => {
                if let Some(mime) = header
                    .strip_prefix("data:")
                    .and_then(|h| h.split(';').next())
                {
                    if !mime.is_empty() {
                        mime_type = mime.to_string();
                    }
                }
                payload.to_string()
            }
            _ => data,
        };

        Self {
            data: payload,
            mime_type,
        }
    }

    /// Create a JPEG attachment
    pub fn jpeg(data: impl Into<String>) -> Self {
        Self::from_base64(data, "image/jpeg")
    }
}

/// A single message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message id
    pub id: Uuid,
    /// Author role
    pub role: MessageRole,
    /// Message text
    pub text: String,
    /// Optional attached image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAttachment>,
    /// When the message was appended
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            image: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    /// Create a model message
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Model, text)
    }

    /// Attach an image
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    /// Check if the message carries an image
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = ChatMessage::user("How much for a villa?");
        assert_eq!(msg.role, MessageRole::User);
        assert!(!msg.has_image());

        let reply = ChatMessage::model("Villa cleaning starts at 1500 EGP.");
        assert_eq!(reply.role, MessageRole::Model);
        assert_ne!(msg.id, reply.id);
    }

    #[test]
    fn test_attachment_strips_data_url() {
        let img = ImageAttachment::from_base64("data:image/png;base64,AAAA", "image/jpeg");
        assert_eq!(img.data, "AAAA");
        assert_eq!(img.mime_type, "image/png");

        let bare = ImageAttachment::jpeg("BBBB");
        assert_eq!(bare.data, "BBBB");
        assert_eq!(bare.mime_type, "image/jpeg");
    }
}
