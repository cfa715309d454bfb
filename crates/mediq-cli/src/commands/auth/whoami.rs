use mediq_config::MediqConfig;
use mediq_core::Role;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::commands::shared::session::fail;
use crate::output::output;

#[derive(Serialize)]
struct WhoamiResponse {
    id: i64,
    email: String,
    role: Role,
    name: String,
    created_at: String,
}

pub async fn handle(config: &MediqConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = bootstrap::client(config)?;
    let ctx = bootstrap::require_session(config)?;

    let profile = match client.me(&ctx).await {
        Ok(profile) => profile,
        Err(error) => return Err(fail(error, config, flags).await),
    };

    output(
        &WhoamiResponse {
            id: profile.id,
            name: profile.display_name(),
            email: profile.email,
            role: profile.role,
            created_at: profile.created_at.to_rfc3339(),
        },
        flags.format,
    )
}
