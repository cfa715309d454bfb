//! Explicit per-call session context.

use reqwest::RequestBuilder;
use reqwest::header::{AUTHORIZATION, COOKIE};

/// How an endpoint expects the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Cookie: <name>=<token>`
    Cookie,
    /// `Authorization: Bearer <token>`
    Bearer,
}

/// The caller's session, passed explicitly to every backend call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    token: Option<String>,
}

impl SessionContext {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Attach the token to `builder` in the endpoint's style. Anonymous
    /// contexts leave the request untouched.
    pub(crate) fn apply(
        &self,
        builder: RequestBuilder,
        style: AuthStyle,
        cookie_name: &str,
    ) -> RequestBuilder {
        let Some(token) = &self.token else {
            return builder;
        };
        match style {
            AuthStyle::Cookie => builder.header(COOKIE, format!("{cookie_name}={token}")),
            AuthStyle::Bearer => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_anonymous() {
        assert!(!SessionContext::with_token("  ").is_authenticated());
        assert!(SessionContext::with_token("a.b.c").is_authenticated());
        assert_eq!(SessionContext::anonymous().token(), None);
    }

    #[test]
    fn cookie_and_bearer_headers() {
        let client = reqwest::Client::new();
        let ctx = SessionContext::with_token("tok");

        let req = ctx
            .apply(client.get("http://localhost/x"), AuthStyle::Cookie, "session")
            .build()
            .unwrap();
        assert_eq!(req.headers()[COOKIE], "session=tok");
        assert!(req.headers().get(AUTHORIZATION).is_none());

        let req = ctx
            .apply(client.get("http://localhost/x"), AuthStyle::Bearer, "session")
            .build()
            .unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn anonymous_adds_nothing() {
        let client = reqwest::Client::new();
        let req = SessionContext::anonymous()
            .apply(client.get("http://localhost/x"), AuthStyle::Bearer, "session")
            .build()
            .unwrap();
        assert!(req.headers().is_empty());
    }
}
