use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named bundle of permission strings (`can_*`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A system account. Account-type flags describe what the person does in the
/// seed chain. Permissions come from the assigned roles.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub is_merchant: bool,
    pub is_grower: bool,
    pub is_qds_producer: bool,
    pub is_inspector: bool,
    pub is_admin: bool,
    pub role_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Human-readable composition of the account-type flags.
    ///
    /// `"Seed Merchant, Inspector"` for a merchant who also inspects,
    /// `"Applicant"` when no flag is set.
    #[must_use]
    pub fn account_type_label(&self) -> String {
        let flags = [
            (self.is_admin, "Administrator"),
            (self.is_merchant, "Seed Merchant"),
            (self.is_grower, "Seed Grower"),
            (self.is_qds_producer, "QDS Producer"),
            (self.is_inspector, "Inspector"),
        ];
        let parts: Vec<&str> = flags
            .iter()
            .filter_map(|(set, label)| set.then_some(*label))
            .collect();
        if parts.is_empty() {
            "Applicant".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "usr-00000001".into(),
            username: "jdoe".into(),
            name: "J. Doe".into(),
            email: None,
            is_merchant: false,
            is_grower: false,
            is_qds_producer: false,
            is_inspector: false,
            is_admin: false,
            role_ids: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn no_flags_is_applicant() {
        assert_eq!(user().account_type_label(), "Applicant");
    }

    #[test]
    fn flags_compose_in_fixed_order() {
        let u = User {
            is_inspector: true,
            is_merchant: true,
            ..user()
        };
        assert_eq!(u.account_type_label(), "Seed Merchant, Inspector");
    }

    #[test]
    fn single_flag() {
        let u = User {
            is_qds_producer: true,
            ..user()
        };
        assert_eq!(u.account_type_label(), "QDS Producer");
    }
}
