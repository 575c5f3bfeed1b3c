//! Database error types for stts-db.

use stts_core::enums::EntityType;
use stts_core::permissions::Permission;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Lookup by id found nothing.
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: EntityType, id: String },

    /// A mutation was attempted without a caller identity.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The caller lacks the permission the mutation names.
    #[error("Forbidden: requires {0}")]
    Forbidden(Permission),

    /// The caller holds the permission but is not allowed on this record.
    #[error("Forbidden: {0}")]
    NotPermitted(String),

    /// A workflow transition left the directed path.
    #[error("Cannot {action} {entity_type} {id} while {from}")]
    InvalidTransition {
        entity_type: EntityType,
        id: String,
        action: String,
        from: String,
    },

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid state encountered (e.g., bad data in DB, concurrent change).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity_type: EntityType, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Other(e.into())
    }
}
