use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::MessageRole;

/// One turn of an in-memory conversation.
///
/// Scoped to a single chat session and never persisted. `interrupt_id` is the
/// opaque resume token attached to an assistant turn that suspended a backend
/// flow; it is echoed back unchanged and never interpreted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupt_id: Option<String>,
    /// Seconds between sending the request and receiving this reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_time: Option<f64>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            agent: None,
            interrupt_id: None,
            thinking_time: None,
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>, agent: Option<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            agent,
            interrupt_id: None,
            thinking_time: None,
        }
    }
}

/// Body of `POST /chat/message`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    /// IANA timezone of the user, e.g. `Asia/Beirut`.
    pub user_tz: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupt_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_value: Option<String>,
}

impl ChatRequest {
    /// A fresh turn that does not resume anything.
    #[must_use]
    pub fn new(message: impl Into<String>, user_tz: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_tz: user_tz.into(),
            interrupt_id: None,
            resume_value: None,
        }
    }

    /// Whether this request continues a suspended backend flow.
    #[must_use]
    pub const fn is_resume(&self) -> bool {
        self.interrupt_id.is_some()
    }
}

/// Successful reply from `POST /chat/message`.
///
/// `reply` is either Markdown text or a JSON-encoded structured payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default)]
    pub agent: Option<String>,
    /// Canonical history as the backend sees it, when returned.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub interrupt_id: Option<String>,
}

impl ChatResponse {
    /// Convert into the assistant turn appended to the transcript.
    #[must_use]
    pub fn into_message(self, thinking_time: Option<f64>) -> ChatMessage {
        ChatMessage {
            role: MessageRole::Assistant,
            content: self.reply,
            agent: self.agent,
            interrupt_id: self.interrupt_id,
            thinking_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_request_omits_resume_fields() {
        let req = ChatRequest::new("hello", "Asia/Beirut");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "hello", "user_tz": "Asia/Beirut"})
        );
        assert!(!req.is_resume());
    }

    #[test]
    fn response_tolerates_extra_backend_fields() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{
                "reply": "Action required",
                "agent": "System",
                "interrupt_id": "int-42",
                "session": "abc",
                "messages": [{"role": "user", "content": "book", "ts": "2025-05-01T12:00:00Z"}]
            }"#,
        )
        .unwrap();
        assert_eq!(resp.interrupt_id.as_deref(), Some("int-42"));
        assert_eq!(resp.messages.len(), 1);

        let msg = resp.into_message(Some(1.5));
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.interrupt_id.as_deref(), Some("int-42"));
        assert_eq!(msg.thinking_time, Some(1.5));
    }
}
