use mediq_chat::{ChatSession, TurnOutcome, transcript};
use mediq_config::MediqConfig;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::GlobalFlags;
use crate::commands::shared::session::expire;

const HELP: &str = "Type a message, /N to pick action N on the last card, /retry, /quit.";

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Message(String),
    Action(usize),
    Retry,
    Help,
    Quit,
    Empty,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" => Input::Empty,
        "/quit" | "/exit" => Input::Quit,
        "/retry" => Input::Retry,
        "/help" | "/?" => Input::Help,
        _ => match line.strip_prefix('/').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n > 0 => Input::Action(n),
            _ => Input::Message(line.to_string()),
        },
    }
}

pub async fn handle(config: &MediqConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut session = super::open_session(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !flags.quiet {
        eprintln!("{HELP}");
    }

    loop {
        eprint!("› ");
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let outcome = match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => {
                eprintln!("{HELP}");
                continue;
            }
            Input::Message(text) => super::with_spinner(session.send(&text)).await,
            Input::Action(n) => {
                let Some(action) = session.latest_actions().get(n - 1).cloned() else {
                    eprintln!("No action {n} on the last card.");
                    continue;
                };
                super::with_spinner(session.perform(&action)).await
            }
            Input::Retry => {
                let Some(card) = session.transcript().trailing_failure().cloned() else {
                    eprintln!("Nothing to retry.");
                    continue;
                };
                match session.retry(&card).await {
                    Some(outcome) => outcome,
                    None => {
                        eprintln!("That error can't be retried.");
                        continue;
                    }
                }
            }
        };

        print_latest(&session);

        if let TurnOutcome::Failed {
            expiry: Some(expiry),
            ..
        } = &outcome
        {
            return Err(expire(expiry, flags).await);
        }
    }

    Ok(())
}

/// Print the reply (or failure card) that the last turn appended.
fn print_latest(session: &ChatSession) {
    if let Some(entry) = session.transcript().entries().last() {
        println!("{}", transcript::render_entry(entry));
    }
}
