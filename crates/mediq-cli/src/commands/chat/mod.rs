mod repl;
mod resume;
mod send;

use mediq_chat::{Card, ChatSession, ErrorCard, TurnOutcome, transcript};
use mediq_config::MediqConfig;
use mediq_core::entities::ChatMessage;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::ChatCommands;
use crate::commands::shared::session::expire;
use crate::output::output_view;
use crate::progress::Progress;

/// Handle `mq chat <subcommand>`.
pub async fn handle(
    action: &ChatCommands,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ChatCommands::Send(args) => send::handle(args, config, flags).await,
        ChatCommands::Repl => repl::handle(config, flags).await,
        ChatCommands::Resume(args) => resume::handle(args, config, flags).await,
    }
}

/// JSON view of one turn.
#[derive(Serialize)]
struct TurnReport<'a> {
    reply: Option<&'a ChatMessage>,
    card: Option<&'a Card>,
    error: Option<&'a ErrorCard>,
    #[serde(skip_serializing_if = "no_history")]
    history: &'a [ChatMessage],
}

fn no_history(history: &&[ChatMessage]) -> bool {
    history.is_empty()
}

impl<'a> TurnReport<'a> {
    fn from_outcome(outcome: &'a TurnOutcome) -> Self {
        match outcome {
            TurnOutcome::Reply {
                message,
                card,
                history,
            } => Self {
                reply: Some(message),
                card: card.as_ref(),
                error: None,
                history,
            },
            TurnOutcome::Failed { card, .. } => Self {
                reply: None,
                card: None,
                error: Some(card),
                history: &[],
            },
        }
    }
}

fn open_session(config: &MediqConfig) -> anyhow::Result<ChatSession> {
    let client = bootstrap::client(config)?;
    Ok(ChatSession::new(client, bootstrap::stored_session(config), config))
}

/// Await one turn behind a spinner.
async fn with_spinner<F>(turn: F) -> TurnOutcome
where
    F: Future<Output = TurnOutcome>,
{
    let spinner = Progress::spinner("Thinking");
    let outcome = turn.await;
    match &outcome {
        TurnOutcome::Reply { .. } => spinner.finish_clear(),
        TurnOutcome::Failed { card, .. } => spinner.finish_err(&card.title),
    }
    outcome
}

/// Print a single-turn result and map failures onto the exit status.
async fn report(
    session: &ChatSession,
    outcome: &TurnOutcome,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    output_view(
        &TurnReport::from_outcome(outcome),
        &transcript::render(session.transcript()),
        flags.format,
    )?;

    match outcome {
        TurnOutcome::Reply { .. } => Ok(()),
        TurnOutcome::Failed {
            expiry: Some(expiry),
            ..
        } => Err(expire(expiry, flags).await),
        TurnOutcome::Failed { card, .. } => {
            anyhow::bail!("chat turn failed [{}]: {}", card.kind, card.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediq_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn reply_report_carries_backend_history() {
        let outcome = TurnOutcome::Reply {
            message: ChatMessage::assistant("Which day?", Some("Scheduler".into())),
            card: None,
            history: vec![ChatMessage::user("I need a dermatologist")],
        };
        let value = serde_json::to_value(TurnReport::from_outcome(&outcome)).unwrap();
        assert_eq!(
            value["history"],
            json!([{"role": "user", "content": "I need a dermatologist"}])
        );
        assert_eq!(value["reply"]["agent"], "Scheduler");
    }

    #[test]
    fn failure_report_has_no_history() {
        let outcome = TurnOutcome::Failed {
            card: ErrorCard::from_kind(ErrorKind::NetworkError, None, "hi"),
            expiry: None,
        };
        let value = serde_json::to_value(TurnReport::from_outcome(&outcome)).unwrap();
        assert!(value.get("history").is_none());
        assert!(value["reply"].is_null());
    }
}
