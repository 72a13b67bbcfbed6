use serde::{Deserialize, Serialize};

pub mod config;
mod error;
pub use error::ApiError;
mod openai;
pub use openai::UpstreamClient;
pub mod parsing;
pub use parsing::{ParseError, SseRelay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: Box<str>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<Box<str>>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<Box<str>>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<Box<str>>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// Body of the streaming chat-completion call made for one user message.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundRequest {
    pub model: Box<str>,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub temperature: f32,
}

impl OutboundRequest {
    /// The system prompt always goes first, followed by the single user message.
    pub fn for_user_message(model: &str, temperature: f32, message: &str) -> Self {
        Self {
            model: model.into(),
            messages: vec![crate::prompts::system(), ChatMessage::user(message)],
            stream: true,
            temperature,
        }
    }
}
