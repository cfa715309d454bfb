//! # mediq-chat
//!
//! The chat side of Mediq: turning assistant replies into interactive cards
//! and card actions back into resumed turns.
//!
//! An assistant reply is either Markdown or a JSON payload tagged by `type`.
//! [`payload::ReplyBody::parse`] classifies it, [`widget`] renders one card per
//! payload variant, and [`resume::follow_up`] builds the next request, echoing
//! the backend's opaque interrupt id. [`session::ChatSession`] drives whole
//! turns against a [`BackendClient`](mediq_client::BackendClient) and keeps
//! the in-memory [`transcript::Transcript`].

pub mod error_card;
pub mod payload;
pub mod resume;
pub mod session;
pub mod transcript;
pub mod widget;

pub use error_card::{ErrorCard, SessionExpiry};
pub use payload::{AssistantPayload, ReplyBody};
pub use session::{ChatSession, TurnOutcome};
pub use transcript::{Entry, Transcript};
pub use widget::{Card, CardAction, CardKind};
