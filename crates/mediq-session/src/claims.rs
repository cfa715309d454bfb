use chrono::{DateTime, Utc};
use mediq_core::{Role, SessionIdentity};

/// Verified session token claims.
///
/// Produced by [`crate::token::verify`], consumed by the route gate and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// The compact token as presented by the caller.
    pub raw_token: String,
    /// Backend user id (`sub` claim).
    pub user_id: String,
    /// Account role (`role` claim). `None` when absent or unrecognized.
    pub role: Option<Role>,
    /// Token expiration time (from `exp` claim).
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    #[must_use]
    pub fn to_identity(&self) -> SessionIdentity {
        SessionIdentity {
            user_id: self.user_id.clone(),
            role: self.role,
        }
    }

    /// Check if the token is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        let threshold = Utc::now() + chrono::TimeDelta::seconds(buffer_secs);
        self.expires_at <= threshold
    }
}
