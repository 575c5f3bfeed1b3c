//! # stts-db
//!
//! libSQL persistence for the seed tracking and traceability system.
//!
//! Holds every relational record: users and roles, crops, regulatory
//! submissions, seed-lab requests, labels, stock, marketplace and the audit
//! trail. Workflow transitions run through one generic engine
//! ([`workflow`]) so each status change is checked against its state machine
//! and audited in the same transaction.
//!
//! Uses the `libsql` crate (v0.9.29): local files, `:memory:` for tests and
//! optional embedded replicas of a remote database.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;
pub mod workflow;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and its single connection, plus ID generation.
pub struct SttsDb {
    db: libsql::Database,
    conn: libsql::Connection,
    remote_replica: bool,
}

impl SttsDb {
    /// Open a local-only database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        Self::from_database(db, false).await
    }

    /// Open an embedded replica of a remote database and pull its state.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be built, the initial
    /// sync fails, or migrations fail.
    pub async fn open_remote_replica(
        path: &str,
        url: &str,
        auth_token: &str,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote_replica(path, url.to_string(), auth_token.to_string())
            .read_your_writes(true)
            .build()
            .await?;
        db.sync().await?;
        tracing::debug!(url, path, "remote replica synced");
        Self::from_database(db, true).await
    }

    async fn from_database(db: libsql::Database, remote_replica: bool) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let stts_db = Self {
            db,
            conn,
            remote_replica,
        };
        stts_db.run_migrations().await?;
        Ok(stts_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub const fn is_remote_replica(&self) -> bool {
        self.remote_replica
    }

    /// Push local writes and pull remote changes. No-op for local databases.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the sync round-trip fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        if !self.remote_replica {
            return Ok(());
        }
        self.db.sync().await?;
        Ok(())
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"prm-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> SttsDb {
        SttsDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "roles",
            "users",
            "user_roles",
            "crops",
            "crop_varieties",
            "crop_inspection_stages",
            "applications",
            "permits",
            "permit_items",
            "crop_declarations",
            "declared_crops",
            "planting_returns",
            "inspection_stages",
            "lab_inspections",
            "seed_labels",
            "stock_records",
            "products",
            "orders",
            "audit_trail",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("prm").await.unwrap();
        assert!(id.starts_with("prm-"), "ID should start with 'prm-': {id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in stts_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn status_check_constraint_rejects_unknown_value() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO users (id, username, name) VALUES ('usr-t1', 'grower', 'Grower')",
                (),
            )
            .await
            .unwrap();
        let result = db
            .conn()
            .execute(
                "INSERT INTO permits (id, permit_type, applicant_id, country, status) \
                 VALUES ('prm-t1', 'import', 'usr-t1', 'Kenya', 'shipped')",
                (),
            )
            .await;
        assert!(result.is_err(), "unknown status should be rejected");
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO crop_varieties (id, crop_id, name) VALUES ('var-t1', 'crp-missing', 'Longe 5')",
                (),
            )
            .await;
        assert!(result.is_err(), "variety without crop should be rejected");
    }

    #[tokio::test]
    async fn file_backed_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stts.db");
        let path = path.to_str().unwrap();
        {
            let db = SttsDb::open_local(path).await.unwrap();
            db.conn()
                .execute("INSERT INTO crops (id, name) VALUES ('crp-t1', 'Maize')", ())
                .await
                .unwrap();
        }
        let db = SttsDb::open_local(path).await.unwrap();
        let mut rows = db
            .conn()
            .query("SELECT name FROM crops WHERE id = 'crp-t1'", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<String>(0).unwrap(), "Maize");
    }
}
