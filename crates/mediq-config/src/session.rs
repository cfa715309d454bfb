//! Session token and cookie settings.

use serde::{Deserialize, Serialize};

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_refresh_cookie_name() -> String {
    "refresh".to_string()
}

fn default_user_id_header() -> String {
    "x-user-id".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Shared secret the backend signs session tokens with.
    #[serde(default)]
    pub secret_key: String,

    /// Signing algorithm. Only `HS256` is accepted.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_refresh_cookie_name")]
    pub refresh_cookie_name: String,

    /// Header injected downstream with the verified user id.
    #[serde(default = "default_user_id_header")]
    pub user_id_header: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            algorithm: default_algorithm(),
            cookie_name: default_cookie_name(),
            refresh_cookie_name: default_refresh_cookie_name(),
            user_id_header: default_user_id_header(),
        }
    }
}

impl SessionConfig {
    /// Verification needs the shared secret.
    pub fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }
}
