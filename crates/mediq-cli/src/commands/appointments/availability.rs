use mediq_config::MediqConfig;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::appointments::AvailabilityArgs;
use crate::commands::shared::session::fail;
use crate::output::output;

#[derive(Serialize)]
struct Slot {
    starts_at: String,
    time: String,
}

pub async fn handle(
    args: &AvailabilityArgs,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = bootstrap::client(config)?;
    let ctx = bootstrap::require_session(config)?;

    let slots = match client
        .doctor_availability(&ctx, args.doctor_id, args.date)
        .await
    {
        Ok(slots) => slots,
        Err(error) => return Err(fail(error, config, flags).await),
    };

    let rows = slots
        .into_iter()
        .map(|slot| Slot {
            starts_at: slot.to_rfc3339(),
            time: slot.format("%H:%M UTC").to_string(),
        })
        .collect::<Vec<_>>();
    output(&rows, flags.format)
}
