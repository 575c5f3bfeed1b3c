//! User update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_merchant: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_grower: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_qds_producer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_inspector: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

pub struct UserUpdateBuilder(UserUpdate);

impl UserUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(UserUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: Option<String>) -> Self {
        self.0.email = Some(email);
        self
    }

    #[must_use]
    pub const fn is_merchant(mut self, flag: bool) -> Self {
        self.0.is_merchant = Some(flag);
        self
    }

    #[must_use]
    pub const fn is_grower(mut self, flag: bool) -> Self {
        self.0.is_grower = Some(flag);
        self
    }

    #[must_use]
    pub const fn is_qds_producer(mut self, flag: bool) -> Self {
        self.0.is_qds_producer = Some(flag);
        self
    }

    #[must_use]
    pub const fn is_inspector(mut self, flag: bool) -> Self {
        self.0.is_inspector = Some(flag);
        self
    }

    #[must_use]
    pub const fn is_admin(mut self, flag: bool) -> Self {
        self.0.is_admin = Some(flag);
        self
    }

    #[must_use]
    pub fn build(self) -> UserUpdate {
        self.0
    }
}

impl Default for UserUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
