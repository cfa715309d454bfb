use clap::{Args, Subcommand};

/// Chat commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ChatCommands {
    /// Send one message and print the reply.
    Send(ChatSendArgs),
    /// Interactive session: `/N` picks a card action, `/retry`, `/quit`.
    Repl,
    /// Resume a suspended flow by interrupt id.
    Resume(ChatResumeArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ChatSendArgs {
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,
}

impl ChatSendArgs {
    #[must_use]
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

#[derive(Clone, Debug, Args)]
pub struct ChatResumeArgs {
    #[arg(long)]
    pub interrupt_id: String,
    #[arg(long)]
    pub value: String,
    /// Visible message (defaults to the value).
    #[arg(long)]
    pub message: Option<String>,
}
