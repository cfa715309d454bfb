use mediq_config::MediqConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => commands::auth::handle(&action, config, flags).await,
        Commands::Chat { action } => commands::chat::handle(&action, config, flags).await,
        Commands::Appointments { action } => {
            commands::appointments::handle(&action, config, flags).await
        }
        Commands::Gate(args) => commands::gate::handle(&args, config, flags),
    }
}
