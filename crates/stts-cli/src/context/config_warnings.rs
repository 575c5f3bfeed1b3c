use stts_config::SttsConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &SttsConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &SttsConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.database.is_remote() && has_single_underscore_key(&env_keys, "STTS_DATABASE") {
        warnings.push(
            "Database config appears default while STTS_DATABASE* env vars exist. Use double underscores (example: STTS_DATABASE__URL)."
                .to_string(),
        );
    }

    if !config.auth.has_token()
        && !config.auth.has_user()
        && has_single_underscore_key(&env_keys, "STTS_AUTH")
    {
        warnings.push(
            "Auth config appears default while STTS_AUTH* env vars exist. Use double underscores (example: STTS_AUTH__TOKEN)."
                .to_string(),
        );
    }

    warnings
}

/// `STTS_AUTH_TOKEN` instead of `STTS_AUTH__TOKEN`.
fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    let nested = format!("{prefix}__");
    keys.iter()
        .any(|key| key.starts_with(prefix) && !key.starts_with(&nested))
}

#[cfg(test)]
mod tests {
    use stts_config::{AuthConfig, SttsConfig};

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_single_underscore_keys() {
        let warnings = collect_unconfigured_warnings(
            &SttsConfig::default(),
            vec![
                ("STTS_DATABASE_URL".to_string(), "libsql://demo".to_string()),
                ("STTS_AUTH_TOKEN".to_string(), "abc".to_string()),
            ],
        );
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn nested_keys_do_not_warn() {
        let warnings = collect_unconfigured_warnings(
            &SttsConfig::default(),
            vec![("STTS_DATABASE__PATH".to_string(), "x.db".to_string())],
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn configured_auth_does_not_warn() {
        let config = SttsConfig {
            auth: AuthConfig {
                user_id: "usr-1".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![("STTS_AUTH_USER".to_string(), "usr-1".to_string())],
        );
        assert!(warnings.is_empty());
    }
}
