mod login;
mod logout;
mod refresh;
mod register;
mod status;
mod whoami;

use mediq_config::MediqConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `mq auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    config: &MediqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, config, flags).await,
        AuthCommands::Register(args) => register::handle(args, config, flags).await,
        AuthCommands::Refresh => refresh::handle(config, flags).await,
        AuthCommands::Logout => logout::handle(config, flags).await,
        AuthCommands::Whoami => whoami::handle(config, flags).await,
        AuthCommands::Status => status::handle(config, flags),
    }
}
