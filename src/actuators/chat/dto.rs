use coach_relay_macro::dto;

#[allow(unused_imports)]
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
///
/// `message` is optional on the wire so that a missing field gets the same
/// 400 answer as an empty one.
#[dto(chat, clone, request)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

#[cfg(all(test, feature = "chat-in", feature = "chat-out"))]
mod tests {
    use super::*;

    #[test]
    fn missing_message_deserializes_to_none() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(request.message.is_none());
    }

    #[test]
    fn serializes_message_field() {
        let json = serde_json::to_value(ChatRequest::new("你好")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "你好" }));
    }
}
