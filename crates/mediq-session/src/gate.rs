//! Route gating middleware.
//!
//! Runs once per incoming request with no shared state: read the session
//! token, decide whether the caller may reach the path, and stamp the verified
//! user id onto the request for downstream handlers.

use http::header::{AUTHORIZATION, LOCATION};
use http::{HeaderName, HeaderValue, Request, Response, StatusCode};
use mediq_config::{RoutesConfig, SessionConfig};
use mediq_core::SessionIdentity;

use crate::claims::SessionClaims;
use crate::cookie;
use crate::error::SessionError;
use crate::token;

/// Which paths need a session and which are for anonymous callers only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    pub protected_prefixes: Vec<String>,
    pub public_auth_paths: Vec<String>,
    pub login_path: String,
    pub home_path: String,
}

impl RoutePolicy {
    #[must_use]
    pub fn from_config(routes: &RoutesConfig) -> Self {
        Self {
            protected_prefixes: routes.protected_prefixes.clone(),
            public_auth_paths: routes.public_auth_paths.clone(),
            login_path: routes.login_path.clone(),
            home_path: routes.home_path.clone(),
        }
    }

    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| matches_segment_prefix(path, prefix))
    }

    #[must_use]
    pub fn is_public_auth(&self, path: &str) -> bool {
        self.public_auth_paths
            .iter()
            .any(|prefix| matches_segment_prefix(path, prefix))
    }
}

/// `/c` matches `/c` and `/c/123`, never `/contact`.
fn matches_segment_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Outcome of running the gate on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through. `identity` is `None` for anonymous callers.
    Continue { identity: Option<SessionIdentity> },
    /// Send the caller elsewhere.
    Redirect { location: String },
}

impl GateDecision {
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// A `307 Temporary Redirect` for [`GateDecision::Redirect`], `None` otherwise.
    #[must_use]
    pub fn redirect_response(&self) -> Option<Response<()>> {
        let Self::Redirect { location } = self else {
            return None;
        };
        let mut response = Response::new(());
        *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
        response
            .headers_mut()
            .insert(LOCATION, HeaderValue::from_str(location).ok()?);
        Some(response)
    }
}

/// Per-request session verification and route gating.
#[derive(Debug, Clone)]
pub struct SessionGate {
    policy: RoutePolicy,
    secret: String,
    cookie_name: String,
    user_id_header: HeaderName,
}

impl SessionGate {
    /// Build a gate from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Other` if the configured user-id header is not a
    /// valid header name.
    pub fn new(routes: &RoutesConfig, session: &SessionConfig) -> Result<Self, SessionError> {
        let user_id_header = HeaderName::from_bytes(session.user_id_header.as_bytes())
            .map_err(|e| {
                SessionError::Other(format!(
                    "invalid user id header '{}': {e}",
                    session.user_id_header
                ))
            })?;

        Ok(Self {
            policy: RoutePolicy::from_config(routes),
            secret: session.secret_key.clone(),
            cookie_name: session.cookie_name.clone(),
            user_id_header,
        })
    }

    #[must_use]
    pub const fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    #[must_use]
    pub const fn user_id_header(&self) -> &HeaderName {
        &self.user_id_header
    }

    /// Verify the caller's session, if any.
    ///
    /// Reads the session cookie first and falls back to an
    /// `Authorization: Bearer` header. Verification failures are logged and
    /// yield `None`; they are never surfaced to the caller.
    pub fn authenticate<B>(&self, request: &Request<B>) -> Option<SessionClaims> {
        let token = cookie::find(request.headers(), &self.cookie_name)
            .or_else(|| bearer_token(request))?;
        self.verify_token(&token)
    }

    /// Verify a raw token, swallowing failures as anonymous.
    pub fn verify_token(&self, token: &str) -> Option<SessionClaims> {
        match token::verify(token, &self.secret) {
            Ok(claims) => Some(claims),
            Err(error) => {
                tracing::debug!(%error, "ignoring invalid session token");
                None
            }
        }
    }

    /// Decide what happens to a request without modifying it.
    pub fn decide<B>(&self, request: &Request<B>) -> GateDecision {
        let claims = self.authenticate(request);
        self.decide_path(request.uri().path(), claims.as_ref())
    }

    /// Decide for a bare path and already-verified claims.
    #[must_use]
    pub fn decide_path(&self, path: &str, claims: Option<&SessionClaims>) -> GateDecision {
        match claims {
            None if self.policy.is_protected(path) => GateDecision::Redirect {
                location: self.policy.login_path.clone(),
            },
            Some(_) if self.policy.is_public_auth(path) => GateDecision::Redirect {
                location: self.policy.home_path.clone(),
            },
            _ => GateDecision::Continue {
                identity: claims.map(SessionClaims::to_identity),
            },
        }
    }

    /// Run the gate and rewrite the request for downstream handlers.
    ///
    /// Any inbound user-id header is removed first so callers cannot spoof an
    /// identity; on `Continue` with a verified session the derived header is
    /// inserted.
    pub fn apply<B>(&self, request: &mut Request<B>) -> GateDecision {
        let decision = self.decide(request);
        request.headers_mut().remove(&self.user_id_header);

        if let GateDecision::Continue {
            identity: Some(identity),
        } = &decision
        {
            match HeaderValue::from_str(&identity.user_id) {
                Ok(value) => {
                    request
                        .headers_mut()
                        .insert(self.user_id_header.clone(), value);
                }
                Err(error) => {
                    tracing::warn!(%error, user_id = %identity.user_id, "user id is not a valid header value");
                }
            }
        }

        tracing::debug!(path = %request.uri().path(), ?decision, "session gate");
        decision
    }
}

fn bearer_token<B>(request: &Request<B>) -> Option<String> {
    let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}
