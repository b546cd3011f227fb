//! Static model catalog and price table.
//!
//! The catalog is hardcoded; it is never queried from the provider.

use crate::models::{qwen, DEFAULT_MODEL_ID};
use crate::providers;

/// Price per thousand tokens used when even the default model is missing
/// from the catalog.
const FALLBACK_PRICE_PER_THOUSAND: f64 = 0.004;

/// Relative cost tier shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostTier {
    Low,
    Medium,
    High,
}

impl CostTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostTier::Low => "low",
            CostTier::Medium => "medium",
            CostTier::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    pub model_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub provider: &'static str,
    pub max_tokens: u32,
    pub cost_tier: CostTier,
    pub price_per_thousand_tokens: f64,
}

static MODELS: &[ModelMetadata] = &[
    ModelMetadata {
        model_id: qwen::TURBO_ID,
        name: qwen::TURBO_NAME,
        description: "High-speed model for simple tasks",
        provider: providers::DASHSCOPE,
        max_tokens: 8192,
        cost_tier: CostTier::Low,
        price_per_thousand_tokens: 0.0008,
    },
    ModelMetadata {
        model_id: qwen::PLUS_ID,
        name: qwen::PLUS_NAME,
        description: "Balanced model, recommended default",
        provider: providers::DASHSCOPE,
        max_tokens: 32768,
        cost_tier: CostTier::Medium,
        price_per_thousand_tokens: 0.004,
    },
    ModelMetadata {
        model_id: qwen::MAX_ID,
        name: qwen::MAX_NAME,
        description: "Strongest reasoning model for complex scenarios",
        provider: providers::DASHSCOPE,
        max_tokens: 8192,
        cost_tier: CostTier::High,
        price_per_thousand_tokens: 0.02,
    },
];

/// All supported models, in catalog order
pub fn get_all_models() -> &'static [ModelMetadata] {
    MODELS
}

pub fn get_model(model_id: &str) -> Option<&'static ModelMetadata> {
    MODELS.iter().find(|m| m.model_id == model_id)
}

pub fn is_supported_model(model_id: &str) -> bool {
    get_model(model_id).is_some()
}

/// Unknown model ids are priced as the default model
pub fn price_per_thousand_tokens(model_id: &str) -> f64 {
    get_model(model_id)
        .or_else(|| get_model(DEFAULT_MODEL_ID))
        .map(|m| m.price_per_thousand_tokens)
        .unwrap_or(FALLBACK_PRICE_PER_THOUSAND)
}

/// Estimated monetary cost of a call that consumed `total_tokens`
pub fn estimate_cost(model_id: &str, total_tokens: u32) -> f64 {
    (f64::from(total_tokens) / 1000.0) * price_per_thousand_tokens(model_id)
}
