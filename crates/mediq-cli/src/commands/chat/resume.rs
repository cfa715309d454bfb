use mediq_config::MediqConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::chat::ChatResumeArgs;

pub async fn handle(
    args: &ChatResumeArgs,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut session = super::open_session(config)?;
    let outcome = super::with_spinner(session.resume(
        &args.interrupt_id,
        &args.value,
        args.message.as_deref(),
    ))
    .await;
    super::report(&session, &outcome, flags).await
}
