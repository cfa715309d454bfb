//! The in-memory message list for one chat session.
//!
//! Never persisted; dropped with the session.

use mediq_core::MessageRole;
use mediq_core::entities::ChatMessage;

use crate::error_card::ErrorCard;
use crate::payload::ReplyBody;
use crate::widget::{self, Card};

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Message(ChatMessage),
    Failure(ErrorCard),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.entries.push(Entry::Message(message));
    }

    pub fn push_failure(&mut self, card: ErrorCard) {
        self.entries.push(Entry::Failure(card));
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent assistant message, if any.
    #[must_use]
    pub fn last_assistant(&self) -> Option<&ChatMessage> {
        self.entries.iter().rev().find_map(|entry| match entry {
            Entry::Message(m) if m.role == MessageRole::Assistant => Some(m),
            _ => None,
        })
    }

    /// The card for the most recent assistant message, if it has one.
    #[must_use]
    pub fn latest_card(&self) -> Option<Card> {
        let message = self.last_assistant()?;
        widget::card_for(&ReplyBody::parse(&message.content))
    }

    /// The most recent failure, if it is the last entry.
    #[must_use]
    pub fn trailing_failure(&self) -> Option<&ErrorCard> {
        match self.entries.last()? {
            Entry::Failure(card) => Some(card),
            Entry::Message(_) => None,
        }
    }
}

/// Text rendering of the whole transcript.
///
/// Depends only on the entries: rendering the same transcript twice yields
/// identical output.
#[must_use]
pub fn render(transcript: &Transcript) -> String {
    transcript
        .entries()
        .iter()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn render_entry(entry: &Entry) -> String {
    match entry {
        Entry::Failure(card) => card.render_text(),
        Entry::Message(message) if message.role == MessageRole::User => {
            format!("› You\n  {}\n", message.content)
        }
        Entry::Message(message) => {
            let mut header = format!("‹ {}", message.agent.as_deref().unwrap_or("Assistant"));
            if let Some(secs) = message.thinking_time {
                header.push_str(&format!(" ({secs:.1}s)"));
            }
            let body = match ReplyBody::parse(&message.content) {
                ReplyBody::Text(text) => indent(&text),
                other => widget::card_for(&other)
                    .map(|card| card.render_text() + &resume_hints(message, &card))
                    .unwrap_or_default(),
            };
            format!("{header}\n{body}")
        }
    }
}

/// The interrupt id and one `mq chat resume` line per action that answers it.
fn resume_hints(message: &ChatMessage, card: &Card) -> String {
    let Some(id) = message.interrupt_id.as_deref() else {
        return String::new();
    };
    let mut out = format!("  interrupt: {id}\n");
    for (index, action) in card.actions.iter().enumerate() {
        if let Some(value) = action.resume_value.as_deref() {
            out.push_str(&format!(
                "  [{}] mq chat resume --interrupt-id {} --value {}\n",
                index + 1,
                shell_word(id),
                shell_word(value)
            ));
        }
    }
    out
}

fn shell_word(raw: &str) -> String {
    let plain = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+@%,".contains(c));
    if plain {
        raw.to_string()
    } else {
        format!("'{}'", raw.replace('\'', "'\\''"))
    }
}

fn indent(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediq_core::ErrorKind;
    use pretty_assertions::assert_eq;

    fn sample() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push_message(ChatMessage::user("I need a cardiologist on Thursday"));
        transcript.push_message(ChatMessage {
            interrupt_id: Some("int-1".into()),
            thinking_time: Some(2.5),
            ..ChatMessage::assistant(
                r#"{"type":"slots","doctor":"Dr. Sara Haddad","options":["09:00","10:00"]}"#,
                Some("Scheduler".into()),
            )
        });
        transcript.push_message(ChatMessage::user("I choose the appointment slot at 09:00"));
        transcript.push_failure(ErrorCard::from_kind(
            ErrorKind::ServerError,
            None,
            "I choose the appointment slot at 09:00",
        ));
        transcript
    }

    #[test]
    fn render_is_idempotent() {
        let transcript = sample();
        let first = render(&transcript);
        let second = render(&transcript);
        assert_eq!(first, second);
        assert_eq!(render(&transcript.clone()), first);
    }

    #[test]
    fn render_shows_cards_and_failures() {
        let rendered = render(&sample());
        assert!(rendered.starts_with("› You\n  I need a cardiologist on Thursday\n"));
        assert!(rendered.contains("‹ Scheduler (2.5s)\n┌─ Available slots with Dr. Sara Haddad\n"));
        assert!(rendered.contains("│ [2] 10:00\n"));
        assert!(rendered.contains("✖ Server error [SERVER_ERROR]"));
    }

    #[test]
    fn latest_card_comes_from_last_assistant_message() {
        let transcript = sample();
        let card = transcript.latest_card().unwrap();
        assert_eq!(card.actions.len(), 2);
        assert_eq!(
            transcript.last_assistant().unwrap().interrupt_id.as_deref(),
            Some("int-1")
        );
    }

    #[test]
    fn trailing_failure_only_when_last() {
        let mut transcript = sample();
        assert!(transcript.trailing_failure().is_some());
        transcript.push_message(ChatMessage::assistant("ok", None));
        assert!(transcript.trailing_failure().is_none());
    }

    #[test]
    fn interrupted_reply_shows_id_and_resume_commands() {
        let mut transcript = Transcript::new();
        transcript.push_message(ChatMessage {
            interrupt_id: Some("int-7f3a".into()),
            ..ChatMessage::assistant(
                r#"{"type":"booking_proposal","doctor_name":"Dr. Sara Haddad","proposed_starts_at_display":"Thursday at 9:00 AM"}"#,
                None,
            )
        });

        let rendered = render(&transcript);
        assert!(rendered.contains("  interrupt: int-7f3a\n"));
        assert!(rendered.contains("  [1] mq chat resume --interrupt-id int-7f3a --value yes\n"));
        assert!(rendered.contains("  [2] mq chat resume --interrupt-id int-7f3a --value no\n"));
    }

    #[test]
    fn resume_commands_skip_actions_without_a_value() {
        let entry = Entry::Message(ChatMessage {
            interrupt_id: Some("int 9".into()),
            ..ChatMessage::assistant(r#"{"type":"booking_conflict"}"#, None)
        });
        let rendered = render_entry(&entry);
        assert!(rendered.contains("  interrupt: int 9\n"));
        assert!(!rendered.contains("mq chat resume"));
    }

    #[test]
    fn resume_arguments_are_shell_quoted() {
        assert_eq!(shell_word("int-1"), "int-1");
        assert_eq!(shell_word("10:00 AM"), "'10:00 AM'");
        assert_eq!(shell_word("it's"), "'it'\\''s'");
        assert_eq!(shell_word(""), "''");
    }

    #[test]
    fn plain_reply_is_indented() {
        let entry = Entry::Message(ChatMessage::assistant("line one\nline two", None));
        assert_eq!(render_entry(&entry), "‹ Assistant\n  line one\n  line two\n");
    }
}
