use anyhow::Context;
use mediq_client::{BackendClient, SessionContext};
use mediq_config::MediqConfig;

use crate::cli::GlobalFlags;

/// Load configuration from `.env`, TOML files and `MEDIQ_*` variables, then
/// apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<MediqConfig> {
    let mut config = MediqConfig::load_with_dotenv().context("failed to load mediq configuration")?;

    if let Some(url) = &flags.backend_url {
        config.backend.base_url.clone_from(url);
    }

    config.validate()?;
    Ok(config)
}

/// A backend client for the configured base URL.
pub fn client(config: &MediqConfig) -> anyhow::Result<BackendClient> {
    let backend = config.require_backend()?;
    tracing::debug!(base_url = %backend.base_url, "using backend");
    Ok(BackendClient::new(backend).with_session_config(&config.session))
}

/// Session context from the locally stored token, anonymous if none.
///
/// With a configured secret the token must verify and be outside the expiry
/// buffer; otherwise it is sent as stored and the backend decides.
pub fn stored_session(config: &MediqConfig) -> SessionContext {
    if !config.session.is_configured() {
        return mediq_session::resolve_token()
            .map_or_else(SessionContext::anonymous, SessionContext::with_token);
    }
    match mediq_session::resolve_and_verify(&config.session.secret_key) {
        Ok(Some(claims)) => SessionContext::with_token(claims.raw_token),
        Ok(None) => SessionContext::anonymous(),
        Err(error) => {
            tracing::warn!(%error, "ignoring stored session");
            SessionContext::anonymous()
        }
    }
}

/// Like [`stored_session`], but fail when nothing usable is stored.
pub fn require_session(config: &MediqConfig) -> anyhow::Result<SessionContext> {
    let ctx = stored_session(config);
    if !ctx.is_authenticated() {
        anyhow::bail!("not logged in. Run 'mq auth login' first.");
    }
    Ok(ctx)
}
