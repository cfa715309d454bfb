//! Route gating policy.

use serde::{Deserialize, Serialize};

fn default_protected_prefixes() -> Vec<String> {
    vec!["/c".to_string()]
}

fn default_public_auth_paths() -> Vec<String> {
    vec!["/login".to_string(), "/register".to_string()]
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_home_path() -> String {
    "/c".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutesConfig {
    /// Path prefixes only authenticated callers may reach.
    #[serde(default = "default_protected_prefixes")]
    pub protected_prefixes: Vec<String>,

    /// Auth pages authenticated callers are sent away from.
    #[serde(default = "default_public_auth_paths")]
    pub public_auth_paths: Vec<String>,

    /// Redirect target for anonymous callers on protected paths.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Redirect target for authenticated callers on auth pages.
    #[serde(default = "default_home_path")]
    pub home_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: default_protected_prefixes(),
            public_auth_paths: default_public_auth_paths(),
            login_path: default_login_path(),
            home_path: default_home_path(),
        }
    }
}

impl RoutesConfig {
    /// Every configured path, for validation.
    pub fn all_paths(&self) -> impl Iterator<Item = &str> {
        self.protected_prefixes
            .iter()
            .chain(self.public_auth_paths.iter())
            .chain([&self.login_path, &self.home_path])
            .map(String::as_str)
    }
}
