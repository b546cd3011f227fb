use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Entry of the static model catalog served by `GET /api/models`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub max_tokens: u32,
    /// Relative cost tier: "low", "medium" or "high"
    pub cost: String,
}
