use mediq_client::appointments::AppointmentQuery;
use mediq_client::view::AppointmentView;
use mediq_config::MediqConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::appointments::AppointmentListArgs;
use crate::commands::shared::session::fail;
use crate::progress::Progress;

pub async fn handle(
    args: &AppointmentListArgs,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = bootstrap::client(config)?;
    let ctx = bootstrap::require_session(config)?;
    let role = super::caller_role(&client, &ctx, config, flags).await?;

    let query = AppointmentQuery {
        limit: Some(args.limit.unwrap_or(config.general.default_limit)),
        doctor_id: args.doctor_id,
        ..AppointmentQuery::default()
    };

    let spinner = Progress::spinner("Loading appointments");
    let result = client.list_appointments(&ctx, &query).await;
    spinner.finish_clear();

    let appointments = match result {
        Ok(appointments) => appointments,
        Err(error) => return Err(fail(error, config, flags).await),
    };

    super::print_view(&AppointmentView::for_role(role, &appointments), flags)
}
