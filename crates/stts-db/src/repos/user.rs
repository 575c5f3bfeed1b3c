//! User and role repository.
//!
//! Roles are named permission bundles. A user's effective permissions are the
//! union of its roles' permissions, which is how the CLI builds an `Actor`
//! when no bearer token is supplied.

use std::collections::BTreeSet;

use chrono::Utc;
use stts_core::entities::{Role, User};
use stts_core::enums::{AuditAction, EntityType};
use stts_core::identity::Actor;
use stts_core::ids::{PREFIX_ROLE, PREFIX_USER};
use stts_core::permissions::Permission;

use crate::error::DatabaseError;
use crate::helpers::{
    SetClauses, get_bool, get_opt_string, opt_value, parse_datetime, require_text,
};
use crate::service::SttsService;
use crate::updates::user::UserUpdate;

const USER_COLS: &str = "id, username, name, email, is_merchant, is_grower, is_qds_producer, \
     is_inspector, is_admin, created_at, updated_at";

const ROLE_COLS: &str = "id, name, permissions, created_at, updated_at";

/// Input for a new account.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub is_merchant: bool,
    pub is_grower: bool,
    pub is_qds_producer: bool,
    pub is_inspector: bool,
    pub is_admin: bool,
}

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        email: get_opt_string(row, 3)?,
        is_merchant: get_bool(row, 4)?,
        is_grower: get_bool(row, 5)?,
        is_qds_producer: get_bool(row, 6)?,
        is_inspector: get_bool(row, 7)?,
        is_admin: get_bool(row, 8)?,
        role_ids: Vec::new(),
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

fn row_to_role(row: &libsql::Row) -> Result<Role, DatabaseError> {
    let permissions: Vec<String> = serde_json::from_str(&row.get::<String>(2)?)
        .map_err(|e| DatabaseError::Query(format!("Invalid role permissions: {e}")))?;
    Ok(Role {
        id: row.get(0)?,
        name: row.get(1)?,
        permissions,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

fn validate_permissions(names: &[String]) -> Result<Vec<String>, DatabaseError> {
    let mut unique = BTreeSet::new();
    for name in names {
        let permission = Permission::from_name(name.trim())
            .ok_or_else(|| DatabaseError::validation(format!("unknown permission '{name}'")))?;
        unique.insert(permission.as_str().to_string());
    }
    Ok(unique.into_iter().collect())
}

impl SttsService {
    // -----------------------------------------------------------------------
    // Roles
    // -----------------------------------------------------------------------

    pub async fn create_role(
        &self,
        name: &str,
        permissions: &[String],
    ) -> Result<Role, DatabaseError> {
        self.authorize(Permission::ManageUsers)?;
        self.insert_role(name, permissions).await
    }

    async fn insert_role(&self, name: &str, permissions: &[String]) -> Result<Role, DatabaseError> {
        let name = require_text("role name", name)?;
        let permissions = validate_permissions(permissions)?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ROLE).await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!("INSERT INTO roles ({ROLE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            libsql::params![
                id.as_str(),
                name,
                serde_json::to_string(&permissions)?,
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.record_audit(&tx, EntityType::Role, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(Role {
            id,
            name: name.to_string(),
            permissions,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_role(&self, id: &str) -> Result<Role, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {ROLE_COLS} FROM roles WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Role, id))?;
        row_to_role(&row)
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {ROLE_COLS} FROM roles ORDER BY name"), ())
            .await?;
        let mut roles = Vec::new();
        while let Some(row) = rows.next().await? {
            roles.push(row_to_role(&row)?);
        }
        Ok(roles)
    }

    /// Replace a role's permission set.
    pub async fn set_role_permissions(
        &self,
        id: &str,
        permissions: &[String],
    ) -> Result<Role, DatabaseError> {
        self.authorize(Permission::ManageUsers)?;
        let permissions = validate_permissions(permissions)?;
        let now = Utc::now();

        let tx = self.db().conn().transaction().await?;
        let changed = tx
            .execute(
                "UPDATE roles SET permissions = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![serde_json::to_string(&permissions)?, now.to_rfc3339(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(EntityType::Role, id));
        }
        self.record_audit(
            &tx,
            EntityType::Role,
            id,
            AuditAction::Updated,
            Some(serde_json::json!({ "permissions": permissions })),
        )
        .await?;
        tx.commit().await?;
        self.get_role(id).await
    }

    pub async fn delete_role(&self, id: &str) -> Result<(), DatabaseError> {
        self.authorize(Permission::ManageUsers)?;
        let tx = self.db().conn().transaction().await?;
        let changed = tx.execute("DELETE FROM roles WHERE id = ?1", [id]).await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(EntityType::Role, id));
        }
        self.record_audit(&tx, EntityType::Role, id, AuditAction::Deleted, None)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub async fn create_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        self.authorize(Permission::ManageUsers)?;
        self.insert_user(new).await
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let username = require_text("username", &new.username)?.to_string();
        let name = require_text("name", &new.name)?.to_string();
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO users ({USER_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            libsql::params![
                id.as_str(),
                username.as_str(),
                name.as_str(),
                new.email.as_deref(),
                i64::from(new.is_merchant),
                i64::from(new.is_grower),
                i64::from(new.is_qds_producer),
                i64::from(new.is_inspector),
                i64::from(new.is_admin),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.record_audit(&tx, EntityType::User, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(User {
            id,
            username,
            name,
            email: new.email,
            is_merchant: new.is_merchant,
            is_grower: new.is_grower,
            is_qds_producer: new.is_qds_producer,
            is_inspector: new.is_inspector,
            is_admin: new.is_admin,
            role_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Create the first administrator and an `administrator` role holding every
    /// permission. Only allowed on an empty user table; needs no caller.
    pub async fn bootstrap_admin(&self, username: &str, name: &str) -> Result<User, DatabaseError> {
        if self.count_users().await? > 0 {
            return Err(DatabaseError::InvalidState(
                "users already exist; bootstrap is only allowed on an empty database".into(),
            ));
        }
        let all: Vec<String> = Permission::ALL.iter().map(|p| p.as_str().to_string()).collect();
        let role = self.insert_role("administrator", &all).await?;
        let user = self
            .insert_user(NewUser {
                username: username.to_string(),
                name: name.to_string(),
                is_admin: true,
                ..NewUser::default()
            })
            .await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO user_roles (user_id, role_id) VALUES (?1, ?2)",
                libsql::params![user.id.as_str(), role.id.as_str()],
            )
            .await?;
        tracing::info!(user_id = %user.id, "administrator bootstrapped");
        self.get_user(&user.id).await
    }

    async fn count_users(&self) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM users", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    async fn role_ids_for(&self, user_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT role_id FROM user_roles WHERE user_id = ?1 ORDER BY role_id",
                [user_id],
            )
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {USER_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::User, id))?;
        let mut user = row_to_user(&row)?;
        user.role_ids = self.role_ids_for(id).await?;
        Ok(user)
    }

    /// List accounts, optionally only inspectors.
    pub async fn list_users(
        &self,
        inspectors_only: bool,
        limit: u32,
    ) -> Result<Vec<User>, DatabaseError> {
        let filter = if inspectors_only {
            "WHERE is_inspector = 1"
        } else {
            ""
        };
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {USER_COLS} FROM users {filter} ORDER BY username LIMIT {limit}"),
                (),
            )
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        for user in &mut users {
            user.role_ids = self.role_ids_for(&user.id).await?;
        }
        Ok(users)
    }

    pub async fn update_user(&self, id: &str, update: UserUpdate) -> Result<User, DatabaseError> {
        self.authorize(Permission::ManageUsers)?;

        let mut sets = SetClauses::new();
        if let Some(ref name) = update.name {
            sets.push("name", require_text("name", name)?.to_string());
        }
        if let Some(ref email) = update.email {
            sets.push("email", opt_value(email.clone()));
        }
        let flags = [
            ("is_merchant", update.is_merchant),
            ("is_grower", update.is_grower),
            ("is_qds_producer", update.is_qds_producer),
            ("is_inspector", update.is_inspector),
            ("is_admin", update.is_admin),
        ];
        for (column, flag) in flags {
            if let Some(flag) = flag {
                sets.push(column, i64::from(flag));
            }
        }

        if sets.is_empty() {
            return self.get_user(id).await;
        }

        let now = Utc::now();
        let (sql, params) = sets.into_update("users", id, now);
        let tx = self.db().conn().transaction().await?;
        let changed = tx.execute(&sql, libsql::params_from_iter(params)).await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(EntityType::User, id));
        }
        self.record_audit(
            &tx,
            EntityType::User,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update)?),
        )
        .await?;
        tx.commit().await?;
        self.get_user(id).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), DatabaseError> {
        self.authorize(Permission::ManageUsers)?;
        let tx = self.db().conn().transaction().await?;
        let changed = tx.execute("DELETE FROM users WHERE id = ?1", [id]).await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(EntityType::User, id));
        }
        self.record_audit(&tx, EntityType::User, id, AuditAction::Deleted, None)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn grant_role(&self, user_id: &str, role_id: &str) -> Result<User, DatabaseError> {
        self.authorize(Permission::ManageUsers)?;
        self.get_user(user_id).await?;
        self.get_role(role_id).await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?1, ?2)",
            libsql::params![user_id, role_id],
        )
        .await?;
        self.record_audit(
            &tx,
            EntityType::User,
            user_id,
            AuditAction::Updated,
            Some(serde_json::json!({ "granted_role": role_id })),
        )
        .await?;
        tx.commit().await?;
        self.get_user(user_id).await
    }

    pub async fn revoke_role(&self, user_id: &str, role_id: &str) -> Result<User, DatabaseError> {
        self.authorize(Permission::ManageUsers)?;
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "DELETE FROM user_roles WHERE user_id = ?1 AND role_id = ?2",
            libsql::params![user_id, role_id],
        )
        .await?;
        self.record_audit(
            &tx,
            EntityType::User,
            user_id,
            AuditAction::Updated,
            Some(serde_json::json!({ "revoked_role": role_id })),
        )
        .await?;
        tx.commit().await?;
        self.get_user(user_id).await
    }

    /// Build the `Actor` for a stored user from the union of its roles' permissions.
    pub async fn actor_for_user(&self, user_id: &str) -> Result<Actor, DatabaseError> {
        let user = self.get_user(user_id).await?;
        let mut permissions = BTreeSet::new();
        for role_id in &user.role_ids {
            permissions.extend(self.get_role(role_id).await?.permissions);
        }
        Ok(Actor {
            user_id: user.id,
            permissions,
        })
    }

    /// Confirm a caller decoded from a bearer token against the stored account.
    ///
    /// The token subject must be a known user, and the resulting actor keeps
    /// only the permissions that both the token and the user's roles grant.
    pub async fn confirm_token_actor(&self, claimed: Actor) -> Result<Actor, DatabaseError> {
        let stored = self.actor_for_user(&claimed.user_id).await?;
        tracing::debug!(
            user_id = %stored.user_id,
            claimed = claimed.permissions.len(),
            stored = stored.permissions.len(),
            "token caller confirmed"
        );
        Ok(claimed.narrowed_to(&stored.permissions))
    }
}
