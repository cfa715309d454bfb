//! Drives chat turns against the backend.
//!
//! A [`ChatSession`] owns one in-memory transcript. Every operation takes
//! `&mut self`, so a session never has two requests in flight.

use std::time::Instant;

use mediq_client::{BackendClient, SessionContext};
use mediq_config::MediqConfig;
use mediq_core::entities::{ChatMessage, ChatRequest};

use crate::error_card::{ErrorCard, SessionExpiry};
use crate::payload::ReplyBody;
use crate::resume;
use crate::transcript::Transcript;
use crate::widget::{self, Card, CardAction};

/// Result of one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The assistant replied. `card` is set when the reply is a structured payload.
    /// `history` is the backend's own view of the conversation, empty when the
    /// backend did not echo it. It is reported as-is and never merged into the
    /// transcript.
    Reply {
        message: ChatMessage,
        card: Option<Card>,
        history: Vec<ChatMessage>,
    },
    /// The turn failed. `expiry` is set when the session is no longer valid;
    /// the session has already dropped its token by then.
    Failed {
        card: ErrorCard,
        expiry: Option<SessionExpiry>,
    },
}

impl TurnOutcome {
    #[must_use]
    pub const fn is_reply(&self) -> bool {
        matches!(self, Self::Reply { .. })
    }
}

pub struct ChatSession {
    client: BackendClient,
    context: SessionContext,
    config: MediqConfig,
    transcript: Transcript,
}

impl ChatSession {
    #[must_use]
    pub fn new(client: BackendClient, context: SessionContext, config: &MediqConfig) -> Self {
        Self {
            client,
            context,
            config: config.clone(),
            transcript: Transcript::new(),
        }
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub const fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Actions on the card of the latest assistant reply.
    #[must_use]
    pub fn latest_actions(&self) -> Vec<CardAction> {
        self.transcript
            .latest_card()
            .map(|card| card.actions)
            .unwrap_or_default()
    }

    /// Send a fresh user message.
    pub async fn send(&mut self, text: &str) -> TurnOutcome {
        let request = ChatRequest::new(text, &self.config.chat.user_tz);
        self.run(request).await
    }

    /// Take an action on the latest assistant card. The follow-up carries
    /// that message's interrupt id, if it had one.
    pub async fn perform(&mut self, action: &CardAction) -> TurnOutcome {
        let request = match self.transcript.last_assistant() {
            Some(source) => resume::follow_up(source, action, &self.config.chat.user_tz),
            None => ChatRequest {
                resume_value: action.resume_value.clone(),
                ..ChatRequest::new(&action.message, &self.config.chat.user_tz)
            },
        };
        self.run(request).await
    }

    /// Resume an interrupted flow by id.
    pub async fn resume(
        &mut self,
        interrupt_id: &str,
        resume_value: &str,
        message: Option<&str>,
    ) -> TurnOutcome {
        let request = resume::explicit(
            interrupt_id,
            resume_value,
            message,
            &self.config.chat.user_tz,
        );
        self.run(request).await
    }

    /// Resend the text of a failed turn. `None` when the card is not retryable.
    pub async fn retry(&mut self, card: &ErrorCard) -> Option<TurnOutcome> {
        let text = card.retry_text.clone()?;
        Some(self.send(&text).await)
    }

    async fn run(&mut self, request: ChatRequest) -> TurnOutcome {
        self.transcript
            .push_message(ChatMessage::user(request.message.clone()));

        let started = Instant::now();
        let result = self.client.send_chat(&self.context, &request).await;
        let elapsed = started.elapsed().as_secs_f64();

        match result {
            Ok(mut response) => {
                let history = std::mem::take(&mut response.messages);
                let message = response.into_message(Some(elapsed));
                let card = widget::card_for(&ReplyBody::parse(&message.content));
                tracing::debug!(
                    agent = message.agent.as_deref().unwrap_or("-"),
                    interrupt = message.interrupt_id.is_some(),
                    card = card.as_ref().map(|c| c.title.as_str()),
                    history = history.len(),
                    elapsed,
                    "chat turn completed"
                );
                self.transcript.push_message(message.clone());
                TurnOutcome::Reply {
                    message,
                    card,
                    history,
                }
            }
            Err(error) => {
                let card = ErrorCard::from_error(&error, &request.message);
                tracing::warn!(kind = %card.kind, %error, "chat turn failed");
                let expiry = card.session_expiry(&self.config);
                if expiry.is_some() {
                    self.context = SessionContext::anonymous();
                }
                self.transcript.push_failure(card.clone());
                TurnOutcome::Failed { card, expiry }
            }
        }
    }
}
