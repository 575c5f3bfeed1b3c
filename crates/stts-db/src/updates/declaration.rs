use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeclarationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_of_seed: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_size: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_quantity: Option<Option<f64>>,
    /// Replaces the declared varieties when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_variety_ids: Option<Vec<String>>,
}
