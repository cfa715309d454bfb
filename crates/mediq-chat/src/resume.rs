//! Follow-up requests for card actions.
//!
//! The interrupt id is a capability token minted by the backend. It is copied
//! byte-for-byte from the message that carried it and never inspected. An
//! action without a resume value starts a fresh turn and sends no id.

use mediq_core::entities::{ChatMessage, ChatRequest};

use crate::widget::CardAction;

/// The request sent when the user takes `action` on the card rendered for
/// `source`.
#[must_use]
pub fn follow_up(source: &ChatMessage, action: &CardAction, user_tz: &str) -> ChatRequest {
    let interrupt_id = action
        .resume_value
        .as_ref()
        .and(source.interrupt_id.clone());
    ChatRequest {
        message: action.message.clone(),
        user_tz: user_tz.to_string(),
        interrupt_id,
        resume_value: action.resume_value.clone(),
    }
}

/// Resume a flow from an interrupt id obtained elsewhere.
///
/// The user-visible message defaults to the resume value itself.
#[must_use]
pub fn explicit(
    interrupt_id: &str,
    resume_value: &str,
    message: Option<&str>,
    user_tz: &str,
) -> ChatRequest {
    ChatRequest {
        message: message.unwrap_or(resume_value).to_string(),
        user_tz: user_tz.to_string(),
        interrupt_id: Some(interrupt_id.to_string()),
        resume_value: Some(resume_value.to_string()),
    }
}
