//! Scheduler payload fixtures, validated against the schema generated from
//! [`AssistantPayload`] and classified the way the chat view sees them.

use mediq_chat::payload::{AssistantPayload, ReplyBody};
use mediq_chat::widget::{self, CardKind};
use rstest::rstest;
use schemars::schema_for;

fn schema_errors(instance: &serde_json::Value) -> Vec<String> {
    let schema = serde_json::to_value(schema_for!(AssistantPayload)).unwrap();
    let validator = jsonschema::validator_for(&schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

#[rstest]
#[case::proposal(
    r#"{"type":"booking_proposal","doctor_id":9,"doctor_name":"Dr. Sara Haddad",
        "doctor_specialty":"Cardiology","proposed_starts_at_utc":"2025-05-01T07:00:00Z",
        "proposed_starts_at_display":"Thu May 1, 10:00","duration_minutes":30}"#,
    CardKind::BookingProposal
)]
#[case::confirm_booking(
    r#"{"type":"confirm_booking","doctor":"Dr. Sara Haddad","starts_at":"2025-05-01T07:00:00Z"}"#,
    CardKind::BookingProposal
)]
#[case::slots(
    r#"{"type":"slots","doctor_id":9,"doctor":"Dr. Sara Haddad","date":"2025-05-01",
        "options":["09:00","09:30"],"agent":"Scheduler"}"#,
    CardKind::Slots
)]
#[case::no_slots(r#"{"type":"no_slots","message":"Nothing free that day."}"#, CardKind::NoSlots)]
#[case::doctors(
    r#"{"type":"doctors","doctors":[{"id":9,"name":"Dr. Sara Haddad","specialty":"Cardiology"}]}"#,
    CardKind::Doctors
)]
#[case::no_doctors(r#"{"type":"no_doctors"}"#, CardKind::NoDoctors)]
#[case::confirmed(
    r#"{"type":"appointment_confirmed","status":"confirmed","appointment_id":41,
        "doctor_name":"Dr. Sara Haddad","start_dt":"2025-05-01T07:00:00Z","location":"Clinic A"}"#,
    CardKind::AppointmentConfirmed
)]
#[case::conflict(
    r#"{"type":"booking_conflict","status":"conflict","message":"Slot taken."}"#,
    CardKind::BookingConflict
)]
#[case::booking_error(r#"{"type":"booking_error","message":"Calendar unavailable"}"#, CardKind::BookingError)]
#[case::proposal_error(r#"{"type":"proposal_error","message":"Bad date"}"#, CardKind::BookingError)]
#[case::error(r#"{"type":"error","message":"Something broke"}"#, CardKind::Error)]
fn fixture_parses_and_matches_schema(#[case] fixture: &str, #[case] expected: CardKind) {
    let body = ReplyBody::parse(fixture);
    let ReplyBody::Payload(payload) = &body else {
        panic!("expected a payload, got {body:?}");
    };

    let reserialized = serde_json::to_value(payload).unwrap();
    let errors = schema_errors(&reserialized);
    assert!(errors.is_empty(), "schema validation failed: {errors:?}");
    assert_eq!(reserialized["type"], payload.kind());

    let card = widget::card_for(&body).unwrap();
    assert_eq!(card.kind, expected);
}

#[test]
fn unknown_type_fails_schema_and_falls_back() {
    let fixture = serde_json::json!({"type": "weather_report", "temp": 21});
    assert!(!schema_errors(&fixture).is_empty());

    let body = ReplyBody::parse(&fixture.to_string());
    let card = widget::card_for(&body).unwrap();
    assert_eq!(card.kind, CardKind::Unrecognized);
    assert!(card.title.contains("weather_report"));
}

#[test]
fn markdown_reply_has_no_card() {
    let body = ReplyBody::parse("**Hello!** How can I help you today?");
    assert!(body.is_text());
    assert!(widget::card_for(&body).is_none());
}
