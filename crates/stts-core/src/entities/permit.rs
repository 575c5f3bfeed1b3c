use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{PermitType, ReviewStatus};

/// An import or export permit application.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Permit {
    pub id: String,
    pub permit_type: PermitType,
    pub applicant_id: String,
    pub country: String,
    pub purpose: Option<String>,
    pub items: Vec<PermitItem>,
    pub status: ReviewStatus,
    pub inspector_id: Option<String>,
    pub status_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A consignment line on a permit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PermitItem {
    pub id: String,
    pub permit_id: String,
    pub crop_variety_id: String,
    pub quantity: f64,
    pub unit: String,
}
