//! # mediq-session
//!
//! Session handling for Mediq.
//!
//! Verifies HS256 session tokens issued by the backend, reads them from the
//! `session` cookie (or an `Authorization: Bearer` header), gates protected and
//! public-auth routes, and stores the terminal client's token locally
//! (`keyring` with env and file fallbacks).

pub mod claims;
pub mod cookie;
pub mod error;
pub mod gate;
pub mod token;
pub mod token_store;

pub use claims::SessionClaims;
pub use error::SessionError;
pub use gate::{GateDecision, RoutePolicy, SessionGate};

/// Stored tokens this close to `exp` are treated as already gone.
pub const EXPIRY_BUFFER_SECS: i64 = 60;

/// Resolve the locally stored session token without verifying it.
#[must_use]
pub fn resolve_token() -> Option<String> {
    token_store::load()
}

/// Load the stored token and verify it against `secret`.
///
/// Returns `Ok(None)` when nothing is stored or the token is about to expire.
///
/// # Errors
///
/// Returns `SessionError` if a stored token fails verification.
pub fn resolve_and_verify(secret: &str) -> Result<Option<SessionClaims>, SessionError> {
    match token_store::load() {
        Some(token) => verify_usable(&token, secret),
        None => Ok(None),
    }
}

/// Verify `token` and drop it when it expires within [`EXPIRY_BUFFER_SECS`].
///
/// # Errors
///
/// Returns `SessionError` if the token fails verification.
pub fn verify_usable(token: &str, secret: &str) -> Result<Option<SessionClaims>, SessionError> {
    let claims = token::verify(token, secret)?;
    if claims.is_near_expiry(EXPIRY_BUFFER_SECS) {
        tracing::warn!(
            expires_at = %claims.expires_at,
            "session expires within {EXPIRY_BUFFER_SECS}s; run `mq auth login`",
        );
        return Ok(None);
    }

    Ok(Some(claims))
}

/// Clear stored credentials.
///
/// # Errors
///
/// Returns `SessionError::TokenStore` if the credentials file cannot be removed.
pub fn logout() -> Result<(), SessionError> {
    token_store::delete()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use mediq_core::Role;

    const SECRET: &str = "test-secret";

    fn signed(expires_in: TimeDelta) -> String {
        token::sign("42", Some(Role::Patient), Utc::now() + expires_in, SECRET).unwrap()
    }

    #[test]
    fn usable_token_yields_claims() {
        let claims = verify_usable(&signed(TimeDelta::hours(1)), SECRET)
            .unwrap()
            .unwrap();
        assert_eq!(claims.user_id, "42");
        assert_eq!(claims.role, Some(Role::Patient));
    }

    #[test]
    fn token_inside_expiry_buffer_is_dropped() {
        let token = signed(TimeDelta::seconds(EXPIRY_BUFFER_SECS / 2));
        assert!(token::verify(&token, SECRET).is_ok());
        assert!(verify_usable(&token, SECRET).unwrap().is_none());
    }

    #[test]
    fn wrong_secret_is_an_error() {
        let result = verify_usable(&signed(TimeDelta::hours(1)), "other-secret");
        assert!(matches!(result, Err(SessionError::InvalidSignature)));
    }
}
