use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ApplicationForm, ReviewStatus};

/// An SR4, SR6 or QDS registration application.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Application {
    pub id: String,
    pub form: ApplicationForm,
    pub applicant_id: String,
    /// Form-specific answers, kept as submitted.
    pub details: serde_json::Value,
    pub status: ReviewStatus,
    pub inspector_id: Option<String>,
    pub status_comment: Option<String>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
