use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::LabelStatus;

/// A request to issue certification labels for a marketable lot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SeedLabel {
    pub id: String,
    pub applicant_id: String,
    pub lab_inspection_id: String,
    pub lot_number: String,
    pub quantity: f64,
    pub status: LabelStatus,
    pub status_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
