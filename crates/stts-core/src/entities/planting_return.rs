use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Decision, InspectionStatus, SeedClass, StageStatus};

/// A seed grower's planting return, inspected in the field stage by stage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PlantingReturn {
    pub id: String,
    pub applicant_id: String,
    pub crop_variety_id: String,
    pub seed_class: SeedClass,
    pub location: String,
    pub area_planted: f64,
    pub quantity_planted: f64,
    pub date_planted: Option<DateTime<Utc>>,
    pub lot_number: Option<String>,
    pub status: InspectionStatus,
    pub inspector_id: Option<String>,
    pub status_comment: Option<String>,
    pub stages: Vec<InspectionStage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlantingReturn {
    /// First stage that still needs a decision, in position order.
    #[must_use]
    pub fn next_open_stage(&self) -> Option<&InspectionStage> {
        self.stages
            .iter()
            .filter(|stage| stage.status != StageStatus::Approved)
            .min_by_key(|stage| stage.position)
    }

    #[must_use]
    pub fn all_stages_approved(&self) -> bool {
        self.stages
            .iter()
            .all(|stage| stage.status == StageStatus::Approved)
    }
}

/// One field visit on a planting return.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InspectionStage {
    pub id: String,
    pub planting_return_id: String,
    pub position: u32,
    pub name: String,
    pub status: StageStatus,
    pub decision: Option<Decision>,
    pub report: Option<serde_json::Value>,
    pub comment: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}
