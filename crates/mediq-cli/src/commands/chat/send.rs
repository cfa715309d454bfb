use mediq_config::MediqConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::chat::ChatSendArgs;

pub async fn handle(
    args: &ChatSendArgs,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut session = super::open_session(config)?;
    let outcome = super::with_spinner(session.send(&args.text())).await;
    super::report(&session, &outcome, flags).await
}
