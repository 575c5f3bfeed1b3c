//! Response payloads returned by mutations and lookups.
//!
//! Status-changing operations answer with [`BasicPayload`]; CRUD operations
//! answer with [`MutationPayload`] carrying the affected entity.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{LabInspection, SeedLabel, StockRecord};

/// `{success, message}` answer of a status-changing mutation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BasicPayload {
    pub success: bool,
    pub message: String,
}

impl BasicPayload {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Fold a mutation result into a payload, reporting the error text on failure.
    pub fn from_result<T, E: std::fmt::Display>(
        result: Result<T, E>,
        message: impl FnOnce(&T) -> String,
    ) -> Self {
        match result {
            Ok(value) => Self::ok(message(&value)),
            Err(error) => Self::failed(error.to_string()),
        }
    }
}

/// `{success, message, entity}` answer of a create/update/delete mutation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MutationPayload<T> {
    pub success: bool,
    pub message: String,
    pub entity: Option<T>,
}

impl<T> MutationPayload<T> {
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>, message: &str) -> Self {
        match result {
            Ok(entity) => Self {
                success: true,
                message: message.to_string(),
                entity: Some(entity),
            },
            Err(error) => Self {
                success: false,
                message: error.to_string(),
                entity: None,
            },
        }
    }
}

/// Seed-side facts about a lot: what is in stock and which label covers it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SeedDetails {
    pub stock: Option<StockRecord>,
    pub label: Option<SeedLabel>,
}

/// Result of the public lot lookup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TrackTraceResult {
    pub lot_number: String,
    pub seed_details: Option<SeedDetails>,
    pub lab_record: Option<LabInspection>,
    pub mother_lot: Option<LabInspection>,
}

impl TrackTraceResult {
    /// Whether the lookup found anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.seed_details.is_none() && self.lab_record.is_none() && self.mother_lot.is_none()
    }
}
