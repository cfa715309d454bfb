//! Structured assistant payloads.
//!
//! The scheduler agent answers with JSON objects discriminated by `type`.
//! Every known shape is one variant of [`AssistantPayload`]; the two booking
//! confirmation shapes (`confirm_booking`, `booking_proposal`) share a variant,
//! as do `booking_error` and `proposal_error`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_SLOT_TEMPLATE: &str = "I choose the appointment slot at ";
pub const DEFAULT_CONFIRM_TEMPLATE: &str = "Yes, that sounds right, please book it.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantPayload {
    #[serde(alias = "confirm_booking")]
    BookingProposal(BookingProposal),
    Slots(SlotList),
    NoSlots(Notice),
    Doctors(DoctorList),
    NoDoctors(Notice),
    AppointmentConfirmed(AppointmentConfirmation),
    BookingConflict(BookingFailure),
    #[serde(alias = "proposal_error")]
    BookingError(BookingFailure),
    Error(Notice),
}

impl AssistantPayload {
    /// Wire name of the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BookingProposal(_) => "booking_proposal",
            Self::Slots(_) => "slots",
            Self::NoSlots(_) => "no_slots",
            Self::Doctors(_) => "doctors",
            Self::NoDoctors(_) => "no_doctors",
            Self::AppointmentConfirmed(_) => "appointment_confirmed",
            Self::BookingConflict(_) => "booking_conflict",
            Self::BookingError(_) => "booking_error",
            Self::Error(_) => "error",
        }
    }
}

/// A booking awaiting a yes/no answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BookingProposal {
    pub doctor_id: Option<i64>,
    #[serde(alias = "doctor")]
    pub doctor_name: Option<String>,
    pub doctor_specialty: Option<String>,
    #[serde(alias = "starts_at")]
    pub proposed_starts_at_utc: Option<String>,
    pub proposed_starts_at_display: Option<String>,
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
    pub message: Option<String>,
    pub agent: Option<String>,
    pub reply_template: Option<String>,
}

/// Open slots for one doctor on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SlotList {
    pub doctor_id: Option<i64>,
    pub doctor: Option<String>,
    pub specialty: Option<String>,
    pub date: Option<String>,
    pub options: Vec<String>,
    pub agent: Option<String>,
    pub reply_template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DoctorOption {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DoctorList {
    pub doctors: Vec<DoctorOption>,
    pub message: Option<String>,
}

/// Informational payload carrying only a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Notice {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppointmentConfirmation {
    pub status: Option<String>,
    pub appointment_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub doctor_name: Option<String>,
    pub doctor_email: Option<String>,
    pub start_dt: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub google_calendar_invite_status: Option<String>,
    pub google_calendar_link: Option<String>,
    pub agent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BookingFailure {
    pub status: Option<String>,
    pub message: Option<String>,
    pub agent: Option<String>,
}

/// What an assistant message body turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    /// Plain Markdown.
    Text(String),
    /// A known structured payload.
    Payload(AssistantPayload),
    /// A JSON object whose `type` is missing, unknown, or whose fields do not
    /// fit the declared variant.
    Unrecognized { kind: Option<String>, raw: Value },
}

impl ReplyBody {
    /// Classify a message body. Pure and infallible.
    ///
    /// Surrounding whitespace and a Markdown code fence (```` ```json ````) are
    /// tolerated around a JSON object.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let candidate = strip_code_fence(content.trim());
        if !candidate.starts_with('{') {
            return Self::Text(content.to_string());
        }

        let Ok(value) = serde_json::from_str::<Value>(candidate) else {
            return Self::Text(content.to_string());
        };

        let kind = value.get("type").and_then(Value::as_str).map(str::to_string);
        match serde_json::from_value::<AssistantPayload>(value.clone()) {
            Ok(payload) => Self::Payload(payload),
            Err(error) => {
                tracing::debug!(?kind, %error, "unrecognized assistant payload");
                Self::Unrecognized { kind, raw: value }
            }
        }
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.trim_end().strip_suffix("```") else {
        return text;
    };
    // drop the info string (`json`, `JSON`, ...) on the opening line
    let body = body
        .split_once('\n')
        .map_or(body, |(info, tail)| if info.trim().chars().all(char::is_alphanumeric) { tail } else { body });
    body.trim()
}
