//! One interactive card per payload variant.
//!
//! Cards are plain data: a title, body lines, and the actions the user can
//! take. Taking an action sends [`CardAction::message`] as the next user turn
//! and, when present, [`CardAction::resume_value`] as the answer to the
//! suspended backend flow.

use serde::Serialize;
use serde_json::Value;

use crate::payload::{
    AppointmentConfirmation, AssistantPayload, BookingFailure, BookingProposal,
    DEFAULT_CONFIRM_TEMPLATE, DEFAULT_SLOT_TEMPLATE, DoctorList, Notice, ReplyBody, SlotList,
};

const DECLINE_MESSAGE: &str = "No, please don't book it.";
const PICK_ANOTHER_MESSAGE: &str = "That time is taken. Please show me other available times.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    BookingProposal,
    Slots,
    NoSlots,
    Doctors,
    NoDoctors,
    AppointmentConfirmed,
    BookingConflict,
    BookingError,
    Error,
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardAction {
    pub label: String,
    /// Text sent as the next user message.
    pub message: String,
    /// Answer for the suspended flow, if this action resumes one.
    pub resume_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub kind: CardKind,
    pub title: String,
    pub lines: Vec<String>,
    pub actions: Vec<CardAction>,
}

impl Card {
    fn new(kind: CardKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    fn line(mut self, line: impl Into<String>) -> Self {
        let line = line.into();
        if !line.trim().is_empty() {
            self.lines.push(line);
        }
        self
    }

    fn maybe_line(self, line: Option<String>) -> Self {
        match line {
            Some(line) => self.line(line),
            None => self,
        }
    }

    fn action(mut self, label: impl Into<String>, message: impl Into<String>, resume: Option<String>) -> Self {
        self.actions.push(CardAction {
            label: label.into(),
            message: message.into(),
            resume_value: resume,
        });
        self
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Boxed text rendering with numbered actions.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = format!("┌─ {}\n", self.title);
        for line in &self.lines {
            for part in line.lines() {
                out.push_str(&format!("│ {part}\n"));
            }
        }
        for (index, action) in self.actions.iter().enumerate() {
            out.push_str(&format!("│ [{}] {}\n", index + 1, action.label));
        }
        out.push_str("└─\n");
        out
    }
}

/// The card for a message body, or `None` for plain text.
#[must_use]
pub fn card_for(body: &ReplyBody) -> Option<Card> {
    match body {
        ReplyBody::Text(_) => None,
        ReplyBody::Payload(payload) => Some(render_payload(payload)),
        ReplyBody::Unrecognized { kind, raw } => Some(render_unrecognized(kind.as_deref(), raw)),
    }
}

#[must_use]
pub fn render_payload(payload: &AssistantPayload) -> Card {
    match payload {
        AssistantPayload::BookingProposal(p) => booking_proposal(p),
        AssistantPayload::Slots(s) => slots(s),
        AssistantPayload::NoSlots(n) => notice(CardKind::NoSlots, "No available slots", n),
        AssistantPayload::Doctors(d) => doctors(d),
        AssistantPayload::NoDoctors(n) => notice(CardKind::NoDoctors, "No doctors found", n),
        AssistantPayload::AppointmentConfirmed(c) => appointment_confirmed(c),
        AssistantPayload::BookingConflict(f) => booking_conflict(f),
        AssistantPayload::BookingError(f) => failure(CardKind::BookingError, "Booking failed", f),
        AssistantPayload::Error(n) => notice(CardKind::Error, "Something went wrong", n),
    }
}

fn booking_proposal(p: &BookingProposal) -> Card {
    let doctor = match (&p.doctor_name, &p.doctor_specialty) {
        (Some(name), Some(specialty)) => Some(format!("{name} ({specialty})")),
        (Some(name), None) => Some(name.clone()),
        _ => None,
    };
    let when = p
        .proposed_starts_at_display
        .clone()
        .or_else(|| p.proposed_starts_at_utc.clone());

    Card::new(CardKind::BookingProposal, "Confirm appointment")
        .maybe_line(p.message.clone())
        .maybe_line(doctor.map(|d| format!("Doctor: {d}")))
        .maybe_line(when.map(|w| format!("When: {w}")))
        .maybe_line(p.duration_minutes.map(|m| format!("Duration: {m} min")))
        .maybe_line(p.notes.clone().map(|n| format!("Notes: {n}")))
        .action(
            "Yes, book it",
            p.reply_template
                .clone()
                .unwrap_or_else(|| DEFAULT_CONFIRM_TEMPLATE.to_string()),
            Some("yes".into()),
        )
        .action("No", DECLINE_MESSAGE, Some("no".into()))
}

fn slots(s: &SlotList) -> Card {
    let title = match (&s.doctor, &s.date) {
        (Some(doctor), Some(date)) => format!("Available slots with {doctor} on {date}"),
        (Some(doctor), None) => format!("Available slots with {doctor}"),
        (None, Some(date)) => format!("Available slots on {date}"),
        (None, None) => "Available slots".to_string(),
    };
    let template = s.reply_template.as_deref().unwrap_or(DEFAULT_SLOT_TEMPLATE);

    let mut card = Card::new(CardKind::Slots, title)
        .maybe_line(s.specialty.clone().map(|sp| format!("Specialty: {sp}")));
    if s.options.is_empty() {
        card = card.line("No times listed.");
    }
    for slot in &s.options {
        card = card.action(slot.clone(), format!("{template}{slot}"), Some(slot.clone()));
    }
    card
}

fn doctors(d: &DoctorList) -> Card {
    let mut card = Card::new(CardKind::Doctors, "Choose a doctor").maybe_line(d.message.clone());
    for doctor in &d.doctors {
        let label = doctor
            .specialty
            .as_ref()
            .map_or_else(|| doctor.name.clone(), |sp| format!("{} ({sp})", doctor.name));
        card = card.action(
            label,
            format!("I'd like to book with {}", doctor.name),
            Some(doctor.id.to_string()),
        );
    }
    card
}

fn appointment_confirmed(c: &AppointmentConfirmation) -> Card {
    Card::new(CardKind::AppointmentConfirmed, "Appointment confirmed")
        .maybe_line(c.doctor_name.clone().map(|d| format!("Doctor: {d}")))
        .maybe_line(c.start_dt.clone().map(|s| format!("When: {s}")))
        .maybe_line(c.location.clone().map(|l| format!("Where: {l}")))
        .maybe_line(c.notes.clone().map(|n| format!("Notes: {n}")))
        .maybe_line(c.appointment_id.map(|id| format!("Reference: #{id}")))
        .maybe_line(c.google_calendar_link.clone().map(|l| format!("Calendar: {l}")))
}

fn booking_conflict(f: &BookingFailure) -> Card {
    Card::new(CardKind::BookingConflict, "Time slot unavailable")
        .line(
            f.message
                .clone()
                .unwrap_or_else(|| "This time slot is already booked.".into()),
        )
        .action("Pick another time", PICK_ANOTHER_MESSAGE, None)
}

fn failure(kind: CardKind, title: &str, f: &BookingFailure) -> Card {
    Card::new(kind, title).maybe_line(f.message.clone())
}

fn notice(kind: CardKind, title: &str, n: &Notice) -> Card {
    Card::new(kind, title).maybe_line(n.message.clone())
}

/// Fallback for JSON that matched no variant: show it verbatim.
#[must_use]
pub fn render_unrecognized(kind: Option<&str>, raw: &Value) -> Card {
    let title = kind.map_or_else(
        || "Unrecognized response".to_string(),
        |k| format!("Unrecognized response ({k})"),
    );
    let pretty = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
    Card::new(CardKind::Unrecognized, title).line(pretty)
}
