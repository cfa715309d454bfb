use figment::Jail;
use mediq_config::MediqConfig;

#[test]
fn external_overrides_fill_config_values() {
    Jail::expect_with(|_jail| {
        let overrides = vec![
            (
                "MEDIQ_SESSION__SECRET_KEY".to_string(),
                "from_external".to_string(),
            ),
            ("MEDIQ_BACKEND__TIMEOUT_SECS".to_string(), "7".to_string()),
        ];

        let config = MediqConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert_eq!(config.session.secret_key, "from_external");
        assert_eq!(config.backend.timeout_secs, 7);
        Ok(())
    });
}

#[test]
fn process_env_beats_external_overrides() {
    Jail::expect_with(|jail| {
        jail.set_env("MEDIQ_SESSION__SECRET_KEY", "from_env");
        let overrides = vec![(
            "MEDIQ_SESSION__SECRET_KEY".to_string(),
            "from_external".to_string(),
        )];

        let config = MediqConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert_eq!(config.session.secret_key, "from_env");
        Ok(())
    });
}

#[test]
fn overrides_without_prefix_are_ignored() {
    Jail::expect_with(|_jail| {
        let overrides = vec![("SESSION__SECRET_KEY".to_string(), "nope".to_string())];

        let config = MediqConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert!(config.session.secret_key.is_empty());
        Ok(())
    });
}
