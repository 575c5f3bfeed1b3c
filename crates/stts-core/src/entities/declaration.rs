use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::InspectionStatus;

/// A QDS producer's declaration of crops planted for certification.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CropDeclaration {
    pub id: String,
    pub applicant_id: String,
    pub source_of_seed: Option<String>,
    pub field_size: Option<f64>,
    pub seed_quantity: Option<f64>,
    pub crops: Vec<DeclaredCrop>,
    pub status: InspectionStatus,
    pub inspector_id: Option<String>,
    pub status_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeclaredCrop {
    pub id: String,
    pub declaration_id: String,
    pub crop_variety_id: String,
}
