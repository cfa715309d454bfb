use mediq_chat::{ErrorCard, SessionExpiry};
use mediq_client::ClientError;
use mediq_config::MediqConfig;
use mediq_core::ErrorKind;

use crate::cli::GlobalFlags;

/// Forget the stored session, wait out the redirect delay, and report where
/// the user should log in again.
pub async fn expire(expiry: &SessionExpiry, flags: &GlobalFlags) -> anyhow::Error {
    if let Err(error) = mediq_session::logout() {
        tracing::warn!(%error, "failed to clear stored credentials");
    }
    tracing::info!(redirect_to = %expiry.redirect_to, "session expired");

    if !flags.quiet {
        eprintln!("Your session has expired. Redirecting to login…");
    }
    tokio::time::sleep(expiry.delay).await;

    anyhow::anyhow!(
        "session expired: log in again with 'mq auth login' ({})",
        expiry.redirect_to
    )
}

/// Turn a backend error into a CLI error, expiring the session first when the
/// backend rejected it.
pub async fn fail(error: ClientError, config: &MediqConfig, flags: &GlobalFlags) -> anyhow::Error {
    if error.kind() == ErrorKind::AuthenticationFailed {
        let card = ErrorCard::from_error(&error, "");
        if let Some(expiry) = card.session_expiry(config) {
            return expire(&expiry, flags).await;
        }
    }
    anyhow::Error::new(error)
}
