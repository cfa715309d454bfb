//! HS256 compact-token signing and verification.
//!
//! The backend issues `header.payload.signature` tokens signed with the shared
//! session secret; claims are `sub` (user id), `role`, and `exp`.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use mediq_core::Role;
use serde_json::Value;
use sha2::Sha256;

use crate::claims::SessionClaims;
use crate::error::SessionError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

/// Verify a session token and return its claims.
///
/// # Errors
///
/// Returns a `SessionError` describing the first check that failed: shape,
/// algorithm, signature, `exp`, then `sub`. Callers at the request edge treat
/// every error as "anonymous".
pub fn verify(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(SessionError::MissingToken);
    }

    let mut parts = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(SessionError::Malformed("expected three segments".into()));
    };

    let header = decode_segment(header_b64, "header")?;
    let alg = header.get("alg").and_then(Value::as_str).unwrap_or_default();
    if alg != ALGORITHM {
        return Err(SessionError::UnsupportedAlgorithm(alg.to_string()));
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|e| SessionError::Malformed(format!("signature encoding: {e}")))?;
    let mut mac = new_mac(secret)?;
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| SessionError::InvalidSignature)?;

    let payload = decode_segment(payload_b64, "payload")?;

    let exp = payload
        .get("exp")
        .and_then(Value::as_i64)
        .ok_or(SessionError::MissingClaim("exp"))?;
    let expires_at = DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| SessionError::Malformed(format!("exp {exp} out of range")))?;
    if expires_at <= Utc::now() {
        return Err(SessionError::Expired);
    }

    let user_id = match payload.get("sub") {
        Some(Value::String(sub)) if !sub.is_empty() => sub.clone(),
        Some(Value::Number(sub)) => sub.to_string(),
        _ => return Err(SessionError::MissingClaim("sub")),
    };

    let role = payload
        .get("role")
        .and_then(Value::as_str)
        .and_then(|r| r.parse::<Role>().ok());

    Ok(SessionClaims {
        raw_token: token.to_string(),
        user_id,
        role,
        expires_at,
    })
}

/// Mint an HS256 token the way the backend does.
///
/// # Errors
///
/// Returns `SessionError::Other` if the secret is empty.
pub fn sign(
    user_id: &str,
    role: Option<Role>,
    expires_at: DateTime<Utc>,
    secret: &str,
) -> Result<String, SessionError> {
    let header = serde_json::json!({ "alg": ALGORITHM, "typ": "JWT" });
    let mut payload = serde_json::json!({ "sub": user_id, "exp": expires_at.timestamp() });
    if let Some(role) = role {
        payload["role"] = Value::from(role.as_str());
    }

    let message = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    );

    let mut mac = new_mac(secret)?;
    mac.update(message.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{message}.{signature}"))
}

/// Decode the `exp` claim without verifying the signature.
///
/// This is a best-effort check for status display. Use [`verify`] before
/// trusting anything in the token.
///
/// # Errors
///
/// Returns `SessionError::Malformed` if the token shape or payload is invalid,
/// or `SessionError::MissingClaim` if `exp` is absent.
pub fn decode_expiry(token: &str) -> Result<DateTime<Utc>, SessionError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(SessionError::Malformed("invalid token format".into()));
    }
    let payload = decode_segment(parts[1], "payload")?;
    let exp = payload["exp"]
        .as_i64()
        .ok_or(SessionError::MissingClaim("exp"))?;
    DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| SessionError::Malformed("invalid exp timestamp".into()))
}

fn new_mac(secret: &str) -> Result<HmacSha256, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::Other("session secret is not configured".into()));
    }
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SessionError::Other(format!("HMAC key rejected: {e}")))
}

fn decode_segment(segment: &str, what: &str) -> Result<Value, SessionError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| SessionError::Malformed(format!("{what} base64 decode failed: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SessionError::Malformed(format!("{what} JSON parse failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SECRET: &str = "unit-test-secret";

    fn encode(value: &str) -> String {
        URL_SAFE_NO_PAD.encode(value)
    }

    fn hand_signed(header: &str, payload: &str, secret: &str) -> String {
        let message = format!("{}.{}", encode(header), encode(payload));
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(message.as_bytes());
        format!(
            "{message}.{}",
            URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
        )
    }

    fn future_exp() -> i64 {
        (Utc::now() + TimeDelta::hours(1)).timestamp()
    }

    #[test]
    fn sign_then_verify_yields_claims() {
        let expires_at = Utc::now() + TimeDelta::minutes(30);
        let token = sign("7", Some(Role::Doctor), expires_at, SECRET).unwrap();

        let claims = verify(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, "7");
        assert_eq!(claims.role, Some(Role::Doctor));
        assert_eq!(claims.expires_at.timestamp(), expires_at.timestamp());
        assert_eq!(claims.raw_token, token);
    }

    #[test]
    fn numeric_sub_is_accepted() {
        let token = hand_signed(
            r#"{"alg":"HS256","typ":"JWT"}"#,
            &format!(r#"{{"sub":12,"role":"patient","exp":{}}}"#, future_exp()),
            SECRET,
        );
        let claims = verify(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, "12");
        assert_eq!(claims.role, Some(Role::Patient));
    }

    #[test]
    fn unknown_role_is_dropped_not_rejected() {
        let token = hand_signed(
            r#"{"alg":"HS256"}"#,
            &format!(r#"{{"sub":"3","role":"nurse","exp":{}}}"#, future_exp()),
            SECRET,
        );
        let claims = verify(&token, SECRET).unwrap();
        assert_eq!(claims.role, None);
    }

    #[test]
    fn wrong_secret_fails_signature() {
        let token = sign("7", None, Utc::now() + TimeDelta::hours(1), "other-secret").unwrap();
        assert!(matches!(
            verify(&token, SECRET),
            Err(SessionError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_payload_fails_signature() {
        let token = sign("7", Some(Role::Patient), Utc::now() + TimeDelta::hours(1), SECRET)
            .unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = encode(&format!(
            r#"{{"sub":"7","role":"admin","exp":{}}}"#,
            future_exp()
        ));
        let forged = format!("{}.{forged_payload}.{}", parts[0], parts[2]);
        assert!(matches!(
            verify(&forged, SECRET),
            Err(SessionError::InvalidSignature)
        ));
    }

    #[test]
    fn alg_none_is_rejected() {
        let token = format!(
            "{}.{}.",
            encode(r#"{"alg":"none"}"#),
            encode(&format!(r#"{{"sub":"1","exp":{}}}"#, future_exp()))
        );
        assert!(matches!(
            verify(&token, SECRET),
            Err(SessionError::UnsupportedAlgorithm(alg)) if alg == "none"
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign("7", None, Utc::now() - TimeDelta::seconds(5), SECRET).unwrap();
        assert!(matches!(verify(&token, SECRET), Err(SessionError::Expired)));
    }

    #[rstest]
    #[case(r#"{"sub":"1"}"#, "exp")]
    #[case(r#"{"exp":4102444800}"#, "sub")]
    #[case(r#"{"sub":"","exp":4102444800}"#, "sub")]
    fn missing_claims_are_rejected(#[case] payload: &str, #[case] claim: &str) {
        let token = hand_signed(r#"{"alg":"HS256"}"#, payload, SECRET);
        match verify(&token, SECRET) {
            Err(SessionError::MissingClaim(name)) => assert_eq!(name, claim),
            other => panic!("expected MissingClaim({claim}), got {other:?}"),
        }
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn empty_token_is_missing(#[case] token: &str) {
        assert!(matches!(verify(token, SECRET), Err(SessionError::MissingToken)));
    }

    #[rstest]
    #[case("not-a-token")]
    #[case("a.b")]
    #[case("a.b.c.d")]
    #[case("!!!.???.***")]
    fn malformed_tokens_are_rejected(#[case] token: &str) {
        assert!(matches!(verify(token, SECRET), Err(SessionError::Malformed(_))));
    }

    #[test]
    fn empty_secret_never_verifies() {
        let token = hand_signed(
            r#"{"alg":"HS256"}"#,
            &format!(r#"{{"sub":"1","exp":{}}}"#, future_exp()),
            "",
        );
        assert!(matches!(verify(&token, ""), Err(SessionError::Other(_))));
    }

    #[test]
    fn decode_expiry_reads_exp_without_secret() {
        let exp = future_exp();
        let token = hand_signed(
            r#"{"alg":"HS256"}"#,
            &format!(r#"{{"sub":"1","exp":{exp}}}"#),
            "whatever",
        );
        assert_eq!(decode_expiry(&token).unwrap().timestamp(), exp);
    }

    #[test]
    fn decode_expiry_invalid_format() {
        let err = decode_expiry("not-a-jwt").unwrap_err();
        assert!(err.to_string().contains("invalid token format"));
    }

    #[test]
    fn decode_expiry_bad_base64() {
        let err = decode_expiry("header.!!!invalid!!!.signature").unwrap_err();
        assert!(err.to_string().contains("base64 decode failed"));
    }
}
