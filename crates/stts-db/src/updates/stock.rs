use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StockUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Option<String>>,
}
