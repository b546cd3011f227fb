use crate::config::QwenConfig;
use agenthub_llm_sdk::client::LlmClient;
use agenthub_llm_sdk::error::LlmError;
use agenthub_llm_sdk::qwen::QwenClient;
use std::sync::Arc;
use std::time::Duration;

/// Builds a provider client from the current settings.
///
/// A client is created per execution so a key changed through
/// `POST /api/config/qwen-key` takes effect on the next call.
pub trait LlmClientFactory: Send + Sync {
    fn create(&self, config: &QwenConfig) -> Result<Arc<dyn LlmClient>, LlmError>;
}

pub struct QwenClientFactory;

impl LlmClientFactory for QwenClientFactory {
    fn create(&self, config: &QwenConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::authentication("Qwen API key is not configured"))?;

        let client = QwenClient::new(api_key)?
            .with_base_url(config.base_url.as_str())
            .with_mode(config.mode)
            .with_timeout(Duration::from_secs(config.timeout_secs))?;

        Ok(Arc::new(client))
    }
}
