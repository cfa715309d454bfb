//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var and cwd manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use mediq_config::MediqConfig;

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[backend]
base_url = "https://api.clinic.test"
timeout_secs = 5

[session]
secret_key = "toml-secret"
cookie_name = "sid"

[routes]
protected_prefixes = ["/c", "/documents"]
login_path = "/signin"

[chat]
user_tz = "Asia/Beirut"
auth_redirect_delay_ms = 500
"#,
        )?;

        let config: MediqConfig = Figment::from(Serialized::defaults(MediqConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.backend.base_url, "https://api.clinic.test");
        assert_eq!(config.backend.timeout_secs, 5);
        assert_eq!(config.session.secret_key, "toml-secret");
        assert_eq!(config.session.cookie_name, "sid");
        assert_eq!(config.session.refresh_cookie_name, "refresh");
        assert_eq!(config.routes.protected_prefixes, vec!["/c", "/documents"]);
        assert_eq!(config.routes.login_path, "/signin");
        assert_eq!(config.routes.home_path, "/c");
        assert_eq!(config.chat.user_tz, "Asia/Beirut");
        assert_eq!(config.chat.auth_redirect_delay_ms, 500);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".mediq")).map_err(|e| e.to_string())?;
        jail.create_file(
            ".mediq/config.toml",
            r#"
[backend]
base_url = "http://backend:8000"
"#,
        )?;

        let config = MediqConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.backend.base_url, "http://backend:8000");
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".mediq")).map_err(|e| e.to_string())?;
        jail.create_file(
            ".mediq/config.toml",
            r#"
[session]
secret_key = "from-toml"
"#,
        )?;
        jail.set_env("MEDIQ_SESSION__SECRET_KEY", "from-env");

        let config = MediqConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.session.secret_key, "from-env");
        Ok(())
    });
}

#[test]
fn env_vars_use_double_underscore_nesting() {
    Jail::expect_with(|jail| {
        jail.set_env("MEDIQ_BACKEND__TIMEOUT_SECS", "12");
        jail.set_env("MEDIQ_CHAT__USER_TZ", "Europe/Paris");

        let config: MediqConfig = Figment::from(Serialized::defaults(MediqConfig::default()))
            .merge(Env::prefixed("MEDIQ_").split("__"))
            .extract()?;

        assert_eq!(config.backend.timeout_secs, 12);
        assert_eq!(config.chat.user_tz, "Europe/Paris");
        Ok(())
    });
}

#[test]
fn invalid_algorithm_is_rejected_at_load() {
    Jail::expect_with(|jail| {
        jail.set_env("MEDIQ_SESSION__ALGORITHM", "none");

        let result = MediqConfig::load();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("session.algorithm"));
        Ok(())
    });
}
