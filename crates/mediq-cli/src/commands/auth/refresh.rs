use mediq_client::SessionContext;
use mediq_config::MediqConfig;
use mediq_session::token_store;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::commands::shared::session::fail;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct AuthRefreshResponse {
    refreshed: bool,
    expires_in: i64,
    token_source: Option<&'static str>,
}

/// `POST /auth/refresh` with the stored refresh token, then keep the rotated pair.
pub async fn handle(config: &MediqConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(refresh) = token_store::load_refresh() else {
        anyhow::bail!("no refresh token stored. Run 'mq auth login' first.");
    };
    let client = bootstrap::client(config)?;

    let spinner = Progress::spinner("Refreshing session");
    let result = client.refresh(&SessionContext::with_token(refresh)).await;
    spinner.finish_clear();

    let session = match result {
        Ok(session) => session,
        Err(error) => return Err(fail(error, config, flags).await),
    };
    token_store::store(&session.session_token)?;
    token_store::store_refresh(&session.refresh_token)?;
    tracing::debug!(expires_in = session.tokens.expires_in, "session refreshed");

    output(
        &AuthRefreshResponse {
            refreshed: true,
            expires_in: session.tokens.expires_in,
            token_source: token_store::detect_token_source().map(|source| source.as_str()),
        },
        flags.format,
    )
}
