use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use stts_core::identity::Actor;

/// Claims read from a bearer token payload.
///
/// The signature is not verified; the issuer is trusted to have done that.
#[derive(Debug, Clone)]
pub struct SttsClaims {
    /// Raw token string as presented.
    pub raw_token: String,
    /// User ID (`sub` claim).
    pub user_id: String,
    /// Flattened truthy permissions.
    pub permissions: BTreeMap<String, bool>,
    /// Token expiration time (`exp` claim).
    pub expires_at: DateTime<Utc>,
}

impl SttsClaims {
    /// Convert to the `Actor` consumed by the service layer.
    #[must_use]
    pub fn to_actor(&self) -> Actor {
        Actor::new(
            self.user_id.clone(),
            self.permissions
                .iter()
                .filter(|(_, granted)| **granted)
                .map(|(name, _)| name.clone()),
        )
    }

    /// Check if the token is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        let threshold = Utc::now() + chrono::TimeDelta::seconds(buffer_secs);
        self.expires_at <= threshold
    }
}
