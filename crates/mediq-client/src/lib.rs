//! # mediq-client
//!
//! Typed HTTP boundary to the Mediq backend.
//!
//! Every call takes an explicit [`SessionContext`]; nothing reads cookies or
//! settings from ambient state. Non-success statuses come back as
//! [`ClientError::Api`] carrying an [`ErrorKind`](mediq_core::ErrorKind) so the
//! UI always has a renderable fallback.
//!
//! - [`auth`]: login, register, refresh, logout, current user
//! - [`chat`]: `POST /chat/message`
//! - [`appointments`]: list, cancel, doctor availability
//! - [`forms`]: client-side validation and submission of the auth forms
//! - [`view`]: role-differentiated appointment cards

pub mod appointments;
pub mod auth;
pub mod chat;
pub mod forms;
pub mod session;
pub mod view;

mod error;
mod http;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use error::{ApiDetail, ClientError, FieldIssue};
pub use session::{AuthStyle, SessionContext};

use mediq_config::{BackendConfig, SessionConfig};

const DEFAULT_SESSION_COOKIE: &str = "session";
const DEFAULT_REFRESH_COOKIE: &str = "refresh";

/// HTTP client for the backend REST API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    backend: BackendConfig,
    session_cookie: String,
    refresh_cookie: String,
}

impl BackendClient {
    /// Create a client for the configured backend.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(backend: &BackendConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(backend.user_agent.clone())
                .timeout(std::time::Duration::from_secs(backend.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            backend: backend.clone(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            refresh_cookie: DEFAULT_REFRESH_COOKIE.to_string(),
        }
    }

    /// Use the cookie names from `session` instead of the defaults.
    #[must_use]
    pub fn with_session_config(mut self, session: &SessionConfig) -> Self {
        self.session_cookie.clone_from(&session.cookie_name);
        self.refresh_cookie.clone_from(&session.refresh_cookie_name);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.backend.base_url
    }

    #[must_use]
    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    fn url(&self, path: &str) -> String {
        self.backend.endpoint(path)
    }

    fn authorized(
        &self,
        builder: reqwest::RequestBuilder,
        ctx: &SessionContext,
        style: AuthStyle,
    ) -> reqwest::RequestBuilder {
        ctx.apply(builder, style, &self.session_cookie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path() {
        let client = BackendClient::new(&BackendConfig {
            base_url: "http://api.test/".into(),
            ..BackendConfig::default()
        });
        assert_eq!(client.url("/auth/me"), "http://api.test/auth/me");
    }

    #[test]
    fn session_config_overrides_cookie_names() {
        let session = SessionConfig {
            cookie_name: "sid".into(),
            refresh_cookie_name: "rid".into(),
            ..SessionConfig::default()
        };
        let client = BackendClient::new(&BackendConfig::default()).with_session_config(&session);
        assert_eq!(client.session_cookie(), "sid");
        assert_eq!(client.refresh_cookie, "rid");
    }
}
