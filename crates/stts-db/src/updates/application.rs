//! Application update builder.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<Option<DateTime<Utc>>>,
}

pub struct ApplicationUpdateBuilder(ApplicationUpdate);

impl ApplicationUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ApplicationUpdate::default())
    }

    #[must_use]
    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.0.details = Some(details);
        self
    }

    #[must_use]
    pub fn valid_until(mut self, valid_until: Option<DateTime<Utc>>) -> Self {
        self.0.valid_until = Some(valid_until);
        self
    }

    #[must_use]
    pub fn build(self) -> ApplicationUpdate {
        self.0
    }
}

impl Default for ApplicationUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
