//! Chat client settings.

use serde::{Deserialize, Serialize};

fn default_user_tz() -> String {
    "UTC".to_string()
}

const fn default_auth_redirect_delay_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// IANA timezone sent with every chat turn.
    #[serde(default = "default_user_tz")]
    pub user_tz: String,

    /// Delay before redirecting to login after the session expires mid-chat.
    #[serde(default = "default_auth_redirect_delay_ms")]
    pub auth_redirect_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            user_tz: default_user_tz(),
            auth_redirect_delay_ms: default_auth_redirect_delay_ms(),
        }
    }
}

impl ChatConfig {
    pub const fn auth_redirect_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.auth_redirect_delay_ms)
    }
}
