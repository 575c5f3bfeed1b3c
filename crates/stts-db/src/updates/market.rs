//! Product update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

pub struct ProductUpdateBuilder(ProductUpdate);

impl ProductUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ProductUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn price(mut self, price: f64) -> Self {
        self.0.price = Some(price);
        self
    }

    #[must_use]
    pub const fn quantity(mut self, quantity: f64) -> Self {
        self.0.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.0.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn build(self) -> ProductUpdate {
        self.0
    }
}

impl Default for ProductUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
