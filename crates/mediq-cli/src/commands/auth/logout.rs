use mediq_client::SessionContext;
use mediq_config::MediqConfig;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
    backend_notified: bool,
}

/// Tell the backend (best effort), then clear local credentials regardless.
pub async fn handle(config: &MediqConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let ctx = mediq_session::resolve_token()
        .map_or_else(SessionContext::anonymous, SessionContext::with_token);
    let backend_notified = if ctx.is_authenticated() {
        match bootstrap::client(config) {
            Ok(client) => match client.logout(&ctx).await {
                Ok(()) => true,
                Err(error) => {
                    tracing::warn!(%error, "backend logout failed; clearing local session anyway");
                    false
                }
            },
            Err(error) => {
                tracing::warn!(%error, "backend not configured; clearing local session only");
                false
            }
        }
    } else {
        false
    };

    mediq_session::logout()?;
    output(
        &AuthLogoutResponse {
            cleared: true,
            backend_notified,
        },
        flags.format,
    )
}
