use clap::{Args, Subcommand};

use crate::cli::subcommands::{AppointmentCommands, AuthCommands, ChatCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Log in, register, and inspect the stored session.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Talk to the assistant.
    Chat {
        #[command(subcommand)]
        action: ChatCommands,
    },
    /// Upcoming appointments.
    Appointments {
        #[command(subcommand)]
        action: AppointmentCommands,
    },
    /// Show what the session middleware decides for a path.
    Gate(GateArgs),
}

/// Arguments for `mq gate`.
#[derive(Clone, Debug, Args)]
pub struct GateArgs {
    /// Request path, e.g. `/c/42`.
    pub path: String,
    /// Session token to present (defaults to the stored one).
    #[arg(long)]
    pub token: Option<String>,
    /// Present no token at all.
    #[arg(long, conflicts_with = "token")]
    pub anonymous: bool,
}
