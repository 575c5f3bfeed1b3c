//! Permission vocabulary checked by every mutation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Permission {
    #[serde(rename = "can_manage_users")]
    ManageUsers,
    #[serde(rename = "can_manage_crops")]
    ManageCrops,
    /// Submit applications, permits, declarations, returns, lab and label requests.
    #[serde(rename = "can_apply")]
    Apply,
    #[serde(rename = "can_assign_inspector")]
    AssignInspector,
    /// Submit field and sampling inspection reports.
    #[serde(rename = "can_inspect")]
    Inspect,
    /// Approve, reject or halt reviews. Also overrides ownership checks.
    #[serde(rename = "can_approve")]
    Approve,
    /// Receive samples and record lab results.
    #[serde(rename = "can_test_seed")]
    TestSeed,
    #[serde(rename = "can_print_labels")]
    PrintLabels,
    /// List products and place or handle orders.
    #[serde(rename = "can_trade")]
    Trade,
}

impl Permission {
    pub const ALL: &'static [Self] = &[
        Self::ManageUsers,
        Self::ManageCrops,
        Self::Apply,
        Self::AssignInspector,
        Self::Inspect,
        Self::Approve,
        Self::TestSeed,
        Self::PrintLabels,
        Self::Trade,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManageUsers => "can_manage_users",
            Self::ManageCrops => "can_manage_crops",
            Self::Apply => "can_apply",
            Self::AssignInspector => "can_assign_inspector",
            Self::Inspect => "can_inspect",
            Self::Approve => "can_approve",
            Self::TestSeed => "can_test_seed",
            Self::PrintLabels => "can_print_labels",
            Self::Trade => "can_trade",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_matches_as_str() {
        for p in Permission::ALL {
            let json = serde_json::to_string(p).unwrap();
            assert_eq!(json, format!("\"{}\"", p.as_str()));
        }
    }

    #[test]
    fn from_name_roundtrip() {
        assert_eq!(Permission::from_name("can_trade"), Some(Permission::Trade));
        assert_eq!(Permission::from_name("trade"), None);
    }
}
