use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::LabStatus;

/// A seed-lab request for a lot: sampling inspection, then lab testing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LabInspection {
    pub id: String,
    pub applicant_id: String,
    pub lot_number: String,
    pub mother_lot: Option<String>,
    pub crop_variety_id: String,
    pub quantity: f64,
    pub status: LabStatus,
    pub inspector_id: Option<String>,
    pub status_comment: Option<String>,
    pub inspection_report: Option<serde_json::Value>,
    pub test_results: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
