//! Planting return update builder.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlantingReturnUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_planted: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_planted: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_planted: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<Option<String>>,
}

pub struct PlantingReturnUpdateBuilder(PlantingReturnUpdate);

impl PlantingReturnUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(PlantingReturnUpdate::default())
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.0.location = Some(location.into());
        self
    }

    #[must_use]
    pub const fn area_planted(mut self, area: f64) -> Self {
        self.0.area_planted = Some(area);
        self
    }

    #[must_use]
    pub const fn quantity_planted(mut self, quantity: f64) -> Self {
        self.0.quantity_planted = Some(quantity);
        self
    }

    #[must_use]
    pub const fn date_planted(mut self, date: Option<DateTime<Utc>>) -> Self {
        self.0.date_planted = Some(date);
        self
    }

    #[must_use]
    pub fn lot_number(mut self, lot_number: Option<String>) -> Self {
        self.0.lot_number = Some(lot_number);
        self
    }

    #[must_use]
    pub fn build(self) -> PlantingReturnUpdate {
        self.0
    }
}

impl Default for PlantingReturnUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
