//! Caller identity configuration.

use serde::{Deserialize, Serialize};

/// Default expiry buffer in seconds.
const fn default_expiry_buffer_secs() -> i64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Bearer token whose payload carries `sub` and `permissions`.
    #[serde(default)]
    pub token: String,

    /// Act as this user (permissions from the user's roles) when no token is set.
    #[serde(default)]
    pub user_id: String,

    /// Tokens expiring within this many seconds are refused.
    #[serde(default = "default_expiry_buffer_secs")]
    pub expiry_buffer_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            user_id: String::new(),
            expiry_buffer_secs: default_expiry_buffer_secs(),
        }
    }
}

impl AuthConfig {
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    #[must_use]
    pub fn has_user(&self) -> bool {
        !self.user_id.is_empty()
    }
}
