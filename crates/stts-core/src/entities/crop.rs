use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A crop with its registered varieties and field-inspection schedule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Crop {
    pub id: String,
    pub name: String,
    pub varieties: Vec<CropVariety>,
    /// Ordered by `position`. Planting returns copy these as their stages.
    pub inspection_stages: Vec<CropInspectionStage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CropVariety {
    pub id: String,
    pub crop_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CropInspectionStage {
    pub id: String,
    pub crop_id: String,
    pub position: u32,
    pub name: String,
    pub period_after_planting_days: Option<u32>,
}
