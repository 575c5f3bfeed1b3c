//! Service layer orchestrating database mutations with authorization and audit.
//!
//! `SttsService` wraps `SttsDb` (raw database access) and the optional caller
//! identity. All repo methods are implemented as `impl SttsService`.

use stts_config::DatabaseConfig;
use stts_core::identity::Actor;
use stts_core::permissions::Permission;

use crate::SttsDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with authorization and audit trail.
///
/// Every mutation method follows this protocol:
/// 1. Check the caller holds the permission the operation names
/// 2. Validate input and re-read current state
/// 3. Begin transaction
/// 4. Execute SQL
/// 5. Append audit entry (inside transaction)
/// 6. Commit transaction
///
/// Reads need no identity.
pub struct SttsService {
    db: SttsDb,
    actor: Option<Actor>,
}

impl SttsService {
    /// Create a new service wrapping a local database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = SttsDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Open the database described by configuration.
    ///
    /// Uses an embedded replica when a remote URL and token are configured,
    /// falling back to the local file if the remote cannot be reached.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the local database cannot be opened.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.is_remote() {
            match SttsDb::open_remote_replica(&config.path, &config.url, &config.auth_token).await {
                Ok(db) => return Ok(Self::from_db(db)),
                Err(e) => {
                    tracing::warn!(error = %e, url = %config.url, "remote replica unavailable, using local database");
                }
            }
        }
        Self::new_local(&config.path).await
    }

    /// Create from an existing `SttsDb` with no caller identity.
    #[must_use]
    pub const fn from_db(db: SttsDb) -> Self {
        Self { db, actor: None }
    }

    /// Attach the caller identity used for authorization and audit.
    #[must_use]
    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn set_actor(&mut self, actor: Option<Actor>) {
        self.actor = actor;
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &SttsDb {
        &self.db
    }

    #[must_use]
    pub const fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub(crate) fn actor_id(&self) -> Option<&str> {
        self.actor.as_ref().map(|a| a.user_id.as_str())
    }

    /// Require a caller holding `permission`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Unauthenticated` without a caller and
    /// `DatabaseError::Forbidden` when the permission is missing.
    pub fn authorize(&self, permission: Permission) -> Result<&Actor, DatabaseError> {
        let actor = self.actor.as_ref().ok_or(DatabaseError::Unauthenticated)?;
        if !actor.has(permission) {
            tracing::debug!(user_id = %actor.user_id, %permission, "permission denied");
            return Err(DatabaseError::Forbidden(permission));
        }
        Ok(actor)
    }

    /// Require the caller to own a record or hold `can_approve`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Unauthenticated` without a caller and
    /// `DatabaseError::NotPermitted` otherwise.
    pub fn authorize_owner(&self, owner_id: &str) -> Result<&Actor, DatabaseError> {
        let actor = self.actor.as_ref().ok_or(DatabaseError::Unauthenticated)?;
        if actor.user_id == owner_id || actor.has(Permission::Approve) {
            return Ok(actor);
        }
        Err(DatabaseError::NotPermitted(format!(
            "{} does not own this record",
            actor.user_id
        )))
    }

    /// Require `can_approve`, or `can_inspect` when the caller is the assigned inspector.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Unauthenticated` without a caller and
    /// `DatabaseError::Forbidden` otherwise.
    pub fn authorize_reviewer(&self, inspector_id: Option<&str>) -> Result<&Actor, DatabaseError> {
        let actor = self.actor.as_ref().ok_or(DatabaseError::Unauthenticated)?;
        let assigned = inspector_id == Some(actor.user_id.as_str());
        if actor.has(Permission::Approve) || (assigned && actor.has(Permission::Inspect)) {
            return Ok(actor);
        }
        Err(DatabaseError::Forbidden(Permission::Approve))
    }

    /// Require the caller to be the assigned inspector holding `can_inspect`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Forbidden` or `DatabaseError::NotPermitted`.
    pub fn authorize_assigned_inspector(
        &self,
        inspector_id: Option<&str>,
    ) -> Result<&Actor, DatabaseError> {
        let actor = self.authorize(Permission::Inspect)?;
        if inspector_id != Some(actor.user_id.as_str()) {
            return Err(DatabaseError::NotPermitted(format!(
                "{} is not the assigned inspector",
                actor.user_id
            )));
        }
        Ok(actor)
    }

    /// Sync the underlying database with the remote, when it is a replica.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the sync fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        self.db.sync().await
    }
}
