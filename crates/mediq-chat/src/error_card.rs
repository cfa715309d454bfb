//! User-facing cards for failed turns.

use std::time::Duration;

use mediq_client::ClientError;
use mediq_config::MediqConfig;
use mediq_core::ErrorKind;
use serde::Serialize;

/// A failed turn, rendered in place of the assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorCard {
    pub kind: ErrorKind,
    pub title: String,
    pub message: String,
    /// The text to resend when the user retries. Only set for retryable kinds.
    pub retry_text: Option<String>,
}

/// Side effect of an expired session: forget credentials and go to login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionExpiry {
    /// `Set-Cookie` values that expire the session and refresh cookies.
    pub clear_cookies: Vec<String>,
    pub redirect_to: String,
    pub delay: Duration,
}

impl ErrorCard {
    #[must_use]
    pub fn from_error(error: &ClientError, original_text: &str) -> Self {
        Self::from_kind(error.kind(), error.detail_message(), original_text)
    }

    #[must_use]
    pub fn from_kind(kind: ErrorKind, detail: Option<&str>, original_text: &str) -> Self {
        let (title, default_message) = match kind {
            ErrorKind::AuthenticationFailed => (
                "Session expired",
                "Your session has expired. Redirecting to login…",
            ),
            ErrorKind::Forbidden => ("Access denied", "You don't have permission to do that."),
            ErrorKind::ValidationError => (
                "Invalid request",
                "The request could not be processed. Please check your input.",
            ),
            ErrorKind::ServerError => (
                "Server error",
                "Something went wrong on our side. Please try again.",
            ),
            ErrorKind::NetworkError => (
                "Connection problem",
                "Could not reach the server. Check your connection and try again.",
            ),
            ErrorKind::UnknownError => ("Unexpected error", "Something unexpected happened."),
        };

        let message = match kind {
            ErrorKind::ValidationError | ErrorKind::Forbidden | ErrorKind::UnknownError => detail
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(default_message)
                .to_string(),
            _ => default_message.to_string(),
        };

        Self {
            kind,
            title: title.to_string(),
            message,
            retry_text: kind.is_retryable().then(|| original_text.to_string()),
        }
    }

    #[must_use]
    pub const fn can_retry(&self) -> bool {
        self.retry_text.is_some()
    }

    /// The expiry effect for `AUTHENTICATION_FAILED`, `None` otherwise.
    #[must_use]
    pub fn session_expiry(&self, config: &MediqConfig) -> Option<SessionExpiry> {
        (self.kind == ErrorKind::AuthenticationFailed).then(|| SessionExpiry {
            clear_cookies: mediq_session::cookie::clear_session_cookies(&config.session),
            redirect_to: config.routes.login_path.clone(),
            delay: config.chat.auth_redirect_delay(),
        })
    }

    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = format!("✖ {} [{}]\n  {}\n", self.title, self.kind, self.message);
        if self.can_retry() {
            out.push_str("  [retry]\n");
        }
        out
    }
}
