//! Seed-lab request and label updates.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LabInspectionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_lot: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedLabelUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}
