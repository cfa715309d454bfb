use mediq_client::appointments::AppointmentQuery;
use mediq_client::view::AppointmentView;
use mediq_config::MediqConfig;
use mediq_core::Role;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::appointments::AppointmentCancelArgs;
use crate::commands::shared::session::fail;
use crate::progress::Progress;

/// Cancel, then print the re-fetched list.
pub async fn handle(
    args: &AppointmentCancelArgs,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = bootstrap::client(config)?;
    let ctx = bootstrap::require_session(config)?;
    let role = super::caller_role(&client, &ctx, config, flags).await?;

    if role != Role::Patient {
        anyhow::bail!("only patients can cancel appointments from here (signed in as {role})");
    }

    let query = AppointmentQuery {
        limit: Some(config.general.default_limit),
        ..AppointmentQuery::default()
    };

    let spinner = Progress::spinner("Cancelling");
    let result = client.cancel_and_refetch(&ctx, args.id, &query).await;
    spinner.finish_clear();

    match result {
        Ok(appointments) => {
            super::print_view(&AppointmentView::for_role(role, &appointments), flags)
        }
        Err(error) => Err(fail(error, config, flags).await),
    }
}
