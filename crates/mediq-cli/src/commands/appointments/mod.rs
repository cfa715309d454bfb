mod availability;
mod cancel;
mod list;

use mediq_client::view::AppointmentView;
use mediq_client::{BackendClient, SessionContext};
use mediq_config::MediqConfig;
use mediq_core::Role;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AppointmentCommands;
use crate::commands::shared::session::fail;
use crate::output::output_view;

/// Handle `mq appointments <subcommand>`.
pub async fn handle(
    action: &AppointmentCommands,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AppointmentCommands::List(args) => list::handle(args, config, flags).await,
        AppointmentCommands::Cancel(args) => cancel::handle(args, config, flags).await,
        AppointmentCommands::Availability(args) => {
            availability::handle(args, config, flags).await
        }
    }
}

/// The caller's role decides which view they get.
async fn caller_role(
    client: &BackendClient,
    ctx: &SessionContext,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<Role> {
    match client.me(ctx).await {
        Ok(profile) => Ok(profile.role),
        Err(error) => Err(fail(error, config, flags).await),
    }
}

fn print_view(view: &AppointmentView, flags: &GlobalFlags) -> anyhow::Result<()> {
    output_view(&view.cards, &view.render(), flags.format)
}
