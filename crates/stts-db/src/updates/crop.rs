//! Crop update builder.
//!
//! `varieties` and `stages` are only applied when the caller asks for the
//! child collections to be replaced.

use serde::Serialize;

/// Input for one inspection stage template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTemplate {
    pub name: String,
    pub period_after_planting_days: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CropUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub varieties: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<StageTemplate>>,
}

pub struct CropUpdateBuilder(CropUpdate);

impl CropUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CropUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn varieties(mut self, varieties: Vec<String>) -> Self {
        self.0.varieties = Some(varieties);
        self
    }

    #[must_use]
    pub fn stages(mut self, stages: Vec<StageTemplate>) -> Self {
        self.0.stages = Some(stages);
        self
    }

    #[must_use]
    pub fn build(self) -> CropUpdate {
        self.0
    }
}

impl Default for CropUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
