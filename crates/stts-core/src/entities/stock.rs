use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SeedClass;

/// Seed held by an owner under a lot number.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StockRecord {
    pub id: String,
    pub owner_id: String,
    pub lot_number: String,
    pub crop_variety_id: String,
    pub seed_class: SeedClass,
    pub quantity: f64,
    /// Where the stock came from (planting return id, import permit id, ...).
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
