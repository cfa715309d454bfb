use mediq_config::MediqConfig;
use mediq_session::token;
use mediq_session::token_store;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize, Default, Debug)]
struct AuthStatusResponse {
    authenticated: bool,
    token_source: Option<&'static str>,
    expires_at: Option<String>,
    /// `None` when no secret is configured to check the signature with.
    verified: Option<bool>,
    user_id: Option<String>,
    role: Option<String>,
    note: Option<String>,
}

/// Local-only status: where the token lives, when it expires, and whether it
/// verifies against the configured secret.
pub fn handle(config: &MediqConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = mediq_session::resolve_token();
    let source = token_store::detect_token_source().map(|source| source.as_str());
    let secret = Some(config.session.secret_key.as_str()).filter(|_| config.session.is_configured());
    output(&describe(raw.as_deref(), source, secret), flags.format)
}

fn describe(
    raw: Option<&str>,
    source: Option<&'static str>,
    secret: Option<&str>,
) -> AuthStatusResponse {
    let Some(raw) = raw else {
        return AuthStatusResponse {
            note: Some("no stored session; run 'mq auth login'".into()),
            ..AuthStatusResponse::default()
        };
    };

    let mut response = AuthStatusResponse {
        token_source: source,
        ..AuthStatusResponse::default()
    };

    match token::decode_expiry(raw) {
        Ok(expires_at) => {
            response.authenticated = expires_at > chrono::Utc::now();
            response.expires_at = Some(expires_at.to_rfc3339());
        }
        Err(error) => response.note = Some(format!("stored token is unreadable: {error}")),
    }

    if let Some(secret) = secret {
        match mediq_session::verify_usable(raw, secret) {
            Ok(Some(claims)) => {
                response.verified = Some(true);
                response.user_id = Some(claims.user_id);
                response.role = claims.role.map(|role| role.to_string());
            }
            Ok(None) => {
                response.verified = Some(true);
                response.authenticated = false;
                response.note = Some(format!(
                    "session expires within {}s; run 'mq auth login'",
                    mediq_session::EXPIRY_BUFFER_SECS
                ));
            }
            Err(error) => {
                response.verified = Some(false);
                response.authenticated = false;
                response.note = Some(error.to_string());
            }
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use mediq_core::Role;
    use pretty_assertions::assert_eq;

    const SECRET: &str = "status-secret";

    fn signed(expires_in: TimeDelta) -> String {
        token::sign("7", Some(Role::Doctor), Utc::now() + expires_in, SECRET).unwrap()
    }

    #[test]
    fn nothing_stored() {
        let status = describe(None, None, Some(SECRET));
        assert!(!status.authenticated);
        assert_eq!(status.note.as_deref(), Some("no stored session; run 'mq auth login'"));
    }

    #[test]
    fn verified_session_reports_identity() {
        let raw = signed(TimeDelta::hours(2));
        let status = describe(Some(&raw), Some("file"), Some(SECRET));
        assert!(status.authenticated);
        assert_eq!(status.verified, Some(true));
        assert_eq!(status.user_id.as_deref(), Some("7"));
        assert_eq!(status.role.as_deref(), Some("doctor"));
        assert_eq!(status.token_source, Some("file"));
    }

    #[test]
    fn session_about_to_expire_is_not_authenticated() {
        let raw = signed(TimeDelta::seconds(20));
        let status = describe(Some(&raw), Some("keyring"), Some(SECRET));
        assert!(!status.authenticated);
        assert_eq!(status.verified, Some(true));
        assert!(status.note.unwrap().contains("expires within 60s"));
    }

    #[test]
    fn without_secret_only_expiry_is_checked() {
        let raw = signed(TimeDelta::hours(2));
        let status = describe(Some(&raw), Some("env"), None);
        assert!(status.authenticated);
        assert_eq!(status.verified, None);
        assert_eq!(status.user_id, None);
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let raw = signed(TimeDelta::hours(2));
        let status = describe(Some(&raw), None, Some("another-secret"));
        assert!(!status.authenticated);
        assert_eq!(status.verified, Some(false));
    }
}
