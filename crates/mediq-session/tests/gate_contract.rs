//! Middleware contract: protected paths need a session, auth pages do not
//! accept one, and the downstream user-id header is always derived.

use chrono::{TimeDelta, Utc};
use http::Request;
use http::header::{AUTHORIZATION, COOKIE};
use mediq_config::{RoutesConfig, SessionConfig};
use mediq_core::Role;
use mediq_session::{GateDecision, SessionGate, token};
use pretty_assertions::assert_eq;
use rstest::rstest;

const SECRET: &str = "contract-secret";

fn gate() -> SessionGate {
    let session = SessionConfig {
        secret_key: SECRET.into(),
        ..SessionConfig::default()
    };
    let routes = RoutesConfig {
        protected_prefixes: vec!["/c".into(), "/appointments".into()],
        ..RoutesConfig::default()
    };
    SessionGate::new(&routes, &session).expect("gate")
}

fn valid_token() -> String {
    token::sign("42", Some(Role::Patient), Utc::now() + TimeDelta::hours(1), SECRET).unwrap()
}

fn request(path: &str, cookie: Option<&str>) -> Request<()> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(()).unwrap()
}

fn redirect(location: &str) -> GateDecision {
    GateDecision::Redirect {
        location: location.into(),
    }
}

#[rstest]
#[case("/c")]
#[case("/c/thread-9")]
#[case("/appointments")]
fn protected_paths_redirect_anonymous_callers(#[case] path: &str) {
    assert_eq!(gate().decide(&request(path, None)), redirect("/login"));
}

#[rstest]
#[case("session=garbage")]
#[case("session=a.b.c")]
#[case("other=1")]
fn protected_paths_redirect_invalid_sessions(#[case] cookie: &str) {
    assert_eq!(gate().decide(&request("/c", Some(cookie))), redirect("/login"));
}

#[rstest]
#[case("/login")]
#[case("/register")]
fn public_auth_paths_redirect_signed_in_callers(#[case] path: &str) {
    let cookie = format!("session={}", valid_token());
    assert_eq!(gate().decide(&request(path, Some(&cookie))), redirect("/c"));
}

#[test]
fn public_auth_paths_admit_anonymous_callers() {
    assert_eq!(
        gate().decide(&request("/login", None)),
        GateDecision::Continue { identity: None }
    );
}

#[test]
fn unrelated_paths_pass_with_or_without_session() {
    assert_eq!(
        gate().decide(&request("/contact", None)),
        GateDecision::Continue { identity: None }
    );
}

#[test]
fn expired_session_is_anonymous() {
    let expired =
        token::sign("42", None, Utc::now() - TimeDelta::minutes(1), SECRET).unwrap();
    let cookie = format!("session={expired}");
    assert_eq!(gate().decide(&request("/c", Some(&cookie))), redirect("/login"));
}

#[test]
fn token_signed_with_other_secret_is_anonymous() {
    let forged =
        token::sign("42", None, Utc::now() + TimeDelta::hours(1), "not-the-secret").unwrap();
    let cookie = format!("session={forged}");
    assert_eq!(gate().decide(&request("/c", Some(&cookie))), redirect("/login"));
}

#[test]
fn bearer_header_is_accepted_when_cookie_is_absent() {
    let request = Request::builder()
        .uri("/c")
        .header(AUTHORIZATION, format!("Bearer {}", valid_token()))
        .body(())
        .unwrap();
    match gate().decide(&request) {
        GateDecision::Continue {
            identity: Some(identity),
        } => assert_eq!(identity.user_id, "42"),
        other => panic!("expected continue with identity, got {other:?}"),
    }
}

#[test]
fn apply_injects_user_id_header() {
    let cookie = format!("theme=dark; session={}", valid_token());
    let mut request = request("/c/1", Some(&cookie));

    let decision = gate().apply(&mut request);

    assert!(!decision.is_redirect());
    assert_eq!(request.headers()["x-user-id"], "42");
}

#[test]
fn apply_strips_spoofed_user_id_header() {
    let mut request = Request::builder()
        .uri("/contact")
        .header("x-user-id", "1")
        .body(())
        .unwrap();

    let decision = gate().apply(&mut request);

    assert_eq!(decision, GateDecision::Continue { identity: None });
    assert!(request.headers().get("x-user-id").is_none());
}

#[test]
fn apply_replaces_spoofed_header_with_verified_id() {
    let cookie = format!("session={}", valid_token());
    let mut request = Request::builder()
        .uri("/c")
        .header(COOKIE, cookie)
        .header("x-user-id", "1")
        .body(())
        .unwrap();

    gate().apply(&mut request);

    let values: Vec<_> = request.headers().get_all("x-user-id").iter().collect();
    assert_eq!(values, vec!["42"]);
}
