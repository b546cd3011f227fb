use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Point-in-time view of the process-wide call counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    #[ts(type = "number")]
    pub api_calls: u64,
    pub total_cost: f64,
    /// Mean latency in milliseconds over successful calls
    pub avg_response_time: f64,
    #[ts(type = "number")]
    pub error_count: u64,
    /// Percentage with two decimals (e.g. "66.67%"), or "0%" before any call
    pub success_rate: String,
}
