use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::OrderStatus;

/// A marketplace listing for a marketable lot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Product {
    pub id: String,
    pub seller_id: String,
    pub lot_number: String,
    pub name: String,
    pub price: f64,
    pub quantity: f64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Order {
    pub id: String,
    pub buyer_id: String,
    pub product_id: String,
    pub quantity: f64,
    pub total_price: f64,
    pub status: OrderStatus,
    pub status_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
