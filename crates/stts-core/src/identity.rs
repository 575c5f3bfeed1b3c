use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::permissions::Permission;

/// The authenticated caller of a mutation.
///
/// Produced by `stts-auth` (token claims) or by the CLI (user + roles from the
/// database), consumed by `stts-db` for per-mutation authorization.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    /// Granted permission names. Unknown names are kept but never match.
    pub permissions: BTreeSet<String>,
}

impl Actor {
    #[must_use]
    pub fn new<I, S>(user_id: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: user_id.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Actor holding every known permission.
    #[must_use]
    pub fn superuser(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Permission::ALL.iter().map(|p| p.as_str()))
    }

    #[must_use]
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(permission.as_str())
    }

    /// Keep only the permissions that `granted` also holds.
    #[must_use]
    pub fn narrowed_to(mut self, granted: &BTreeSet<String>) -> Self {
        self.permissions.retain(|p| granted.contains(p));
        self
    }
}
