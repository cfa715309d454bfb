//! # mediq-config
//!
//! Layered configuration loading for Mediq using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MEDIQ_*` prefix, `__` as separator)
//! 2. Externally supplied overrides ([`MediqConfig::load_with_env_overrides`])
//! 3. Project-level `.mediq/config.toml`
//! 4. User-level `~/.config/mediq/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `MEDIQ_BACKEND__BASE_URL` -> `backend.base_url`,
//! `MEDIQ_SESSION__SECRET_KEY` -> `session.secret_key`, etc.
//!
//! The loaded value is passed explicitly into every client and gate; nothing in
//! the workspace reads configuration from a global.
//!
//! # Usage
//!
//! ```no_run
//! use mediq_config::MediqConfig;
//!
//! let config = MediqConfig::load_with_dotenv().expect("config");
//! println!("backend: {}", config.backend.base_url);
//! ```

mod backend;
mod chat;
mod error;
mod general;
mod routes;
mod session;

pub use backend::BackendConfig;
pub use chat::ChatConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use routes::RoutesConfig;
pub use session::SessionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const ENV_PREFIX: &str = "MEDIQ_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MediqConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl MediqConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env_overrides(&[])
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration with externally supplied `MEDIQ_*` pairs layered
    /// between the TOML files and the process environment.
    pub fn load_with_env_overrides(overrides: &[(String, String)]) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_with_overrides(overrides).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain without overrides.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        Self::figment_with_overrides(&[])
    }

    fn figment_with_overrides(overrides: &[(String, String)]) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".mediq/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        for (key, raw) in overrides {
            let Some(path) = env_key_to_path(key) else {
                tracing::debug!(key, "ignoring override without MEDIQ_ prefix");
                continue;
            };
            let value = raw
                .parse::<Value>()
                .unwrap_or_else(|_| Value::from(raw.clone()));
            figment = figment.merge(Serialized::defaults(figment::util::nest(&path, value)));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values the rest of the workspace cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.session.algorithm.eq_ignore_ascii_case("HS256") {
            return Err(ConfigError::InvalidValue {
                field: "session.algorithm".into(),
                reason: format!("unsupported algorithm '{}', only HS256", self.session.algorithm),
            });
        }

        if let Some(bad) = self.routes.all_paths().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::InvalidValue {
                field: "routes".into(),
                reason: format!("path '{bad}' must start with '/'"),
            });
        }

        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "session.cookie_name".into(),
                reason: "must not be empty".into(),
            });
        }

        Ok(())
    }

    /// Fail with [`ConfigError::NotConfigured`] unless the backend URL is set.
    pub fn require_backend(&self) -> Result<&BackendConfig, ConfigError> {
        if self.backend.is_configured() {
            Ok(&self.backend)
        } else {
            Err(ConfigError::NotConfigured {
                section: "backend".into(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mediq").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory. Silently does nothing if
    /// no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

/// `MEDIQ_SESSION__SECRET_KEY` -> `session.secret_key`.
fn env_key_to_path(key: &str) -> Option<String> {
    let rest = key.strip_prefix(ENV_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_ascii_lowercase().replace("__", "."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MediqConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.session.is_configured());
        assert_eq!(config.routes.login_path, "/login");
        assert_eq!(config.routes.home_path, "/c");
        assert_eq!(config.chat.auth_redirect_delay_ms, 2000);
    }

    #[test]
    fn env_key_maps_to_dotted_path() {
        assert_eq!(
            env_key_to_path("MEDIQ_SESSION__SECRET_KEY").as_deref(),
            Some("session.secret_key")
        );
        assert_eq!(env_key_to_path("OTHER_KEY"), None);
        assert_eq!(env_key_to_path("MEDIQ_"), None);
    }

    #[test]
    fn rejects_non_hs256_algorithm() {
        let mut config = MediqConfig::default();
        config.session.algorithm = "RS256".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("session.algorithm"));
    }

    #[test]
    fn rejects_relative_route_paths() {
        let mut config = MediqConfig::default();
        config.routes.protected_prefixes.push("dashboard".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("dashboard"));
    }

    #[test]
    fn require_backend_fails_on_empty_url() {
        let mut config = MediqConfig::default();
        config.backend.base_url = "  ".into();
        assert!(matches!(
            config.require_backend(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }
}
