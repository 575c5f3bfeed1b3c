//! Permit update builder.

use serde::Serialize;

/// Input for one permit line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermitItemInput {
    pub crop_variety_id: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PermitUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<Option<String>>,
    /// Replaces every item when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PermitItemInput>>,
}

pub struct PermitUpdateBuilder(PermitUpdate);

impl PermitUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(PermitUpdate::default())
    }

    #[must_use]
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.0.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn purpose(mut self, purpose: Option<String>) -> Self {
        self.0.purpose = Some(purpose);
        self
    }

    #[must_use]
    pub fn items(mut self, items: Vec<PermitItemInput>) -> Self {
        self.0.items = Some(items);
        self
    }

    #[must_use]
    pub fn build(self) -> PermitUpdate {
        self.0
    }
}

impl Default for PermitUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
