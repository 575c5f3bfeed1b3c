//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Decision;

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Detail for `AuditAction::InspectorAssigned`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InspectorAssignedDetail {
    pub inspector_id: String,
    pub previous_inspector_id: Option<String>,
    pub comment: Option<String>,
}

/// Detail for `AuditAction::StageSubmitted`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StageSubmittedDetail {
    pub stage_id: String,
    pub stage_name: String,
    pub decision: Decision,
    pub comment: Option<String>,
}
