//! Database (libSQL) configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".stts/stts.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file. With a remote `url` this is the embedded replica.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote libSQL URL (e.g., `libsql://stts-prod.turso.io`). Empty = local only.
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Whether a remote replica can be opened.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".stts/stts.db");
        assert!(!config.is_remote());
    }

    #[test]
    fn remote_requires_url_and_token() {
        let config = DatabaseConfig {
            url: "libsql://stts.turso.io".into(),
            ..Default::default()
        };
        assert!(!config.is_remote());

        let config = DatabaseConfig {
            auth_token: "token".into(),
            ..config
        };
        assert!(config.is_remote());
    }
}
