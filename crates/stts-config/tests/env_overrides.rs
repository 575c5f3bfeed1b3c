use figment::Jail;
use stts_config::SttsConfig;

#[test]
fn env_fills_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("STTS_AUTH__TOKEN", "header.payload.sig");
        jail.set_env("STTS_DATABASE__PATH", "/tmp/stts-test.db");

        let config = SttsConfig::load().expect("config loads");
        assert_eq!(config.auth.token, "header.payload.sig");
        assert_eq!(config.database.path, "/tmp/stts-test.db");
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".stts")?;
        jail.create_file(
            ".stts/config.toml",
            r#"
[general]
default_limit = 50
"#,
        )?;
        jail.set_env("STTS_GENERAL__DEFAULT_LIMIT", "5");

        let config = SttsConfig::load().expect("config loads");
        assert_eq!(config.general.default_limit, 5);
        Ok(())
    });
}

#[test]
fn negative_expiry_buffer_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("STTS_AUTH__EXPIRY_BUFFER_SECS", "-5");
        let err = SttsConfig::load().expect_err("negative buffer must fail");
        assert!(err.to_string().contains("auth.expiry_buffer_secs"));
        Ok(())
    });
}
