use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

use crate::{
    error::LlmError,
    qwen::{
        builder::QwenMessageBuilder,
        types::{
            QwenApiMode, QwenChatCompletionRequest, QwenChatRequest, QwenGenerationRequest,
            QwenMessage, QwenResponseBody, QwenRole,
        },
    },
    types::{CompletionRequest, CompletionResponse, Role, Usage, DEFAULT_TEMPERATURE, DEFAULT_TOP_P},
};

/// Default DashScope endpoint
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const NATIVE_PATH: &str = "/api/v1/services/aigc/text-generation/generation";
const COMPATIBLE_PATH: &str = "/compatible-mode/v1/chat/completions";

/// Qwen client for Alibaba Cloud DashScope
pub struct QwenClient {
    api_key: String,
    base_url: String,
    mode: QwenApiMode,
    http_client: reqwest::Client,
}

impl QwenClient {
    /// Create a new Qwen client with the given API key.
    ///
    /// Fails when the key is empty: a gateway never exists without credentials.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::authentication("Qwen API key is not configured"));
        }

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: QwenApiMode::default(),
            http_client: build_http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Select the endpoint family
    pub fn with_mode(mut self, mode: QwenApiMode) -> Self {
        self.mode = mode;
        self
    }

    /// Bound every provider call by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.http_client = build_http_client(timeout)?;
        Ok(self)
    }

    pub fn mode(&self) -> QwenApiMode {
        self.mode
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start building a chat request
    pub fn message_builder(&self) -> QwenMessageBuilder<'_> {
        QwenMessageBuilder::new(self)
    }

    fn endpoint(&self) -> String {
        let path = match self.mode {
            QwenApiMode::Native => NATIVE_PATH,
            QwenApiMode::Compatible => COMPATIBLE_PATH,
        };
        format!("{}{}", self.base_url, path)
    }

    /// Issue one chat call and return the parsed body as-is.
    ///
    /// Any transport failure or non-2xx status is returned as a single error;
    /// nothing is retried.
    pub async fn chat(&self, request: QwenChatRequest) -> Result<QwenResponseBody, LlmError> {
        let url = self.endpoint();
        let model = request.model.clone();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| LlmError::authentication("Invalid API key format"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let builder = self.http_client.post(&url).headers(headers);
        let builder = match self.mode {
            QwenApiMode::Native => {
                let body = QwenGenerationRequest::from(request);
                log_payload(&body);
                builder
                    .header("X-DashScope-SSE", "disable")
                    .json(&body)
            }
            QwenApiMode::Compatible => {
                let body = QwenChatCompletionRequest::from(request);
                log_payload(&body);
                builder.json(&body)
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), model = %model, "Qwen API call failed");
            let message = if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                text
            };
            return Err(LlmError::api_error(status.as_u16(), message));
        }

        let body: QwenResponseBody = serde_json::from_str(&text)?;
        tracing::info!(
            model = %model,
            total_tokens = body.total_tokens(),
            "Qwen usage"
        );

        Ok(body)
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Network { source: e })
}

fn log_payload<T: serde::Serialize>(body: &T) {
    if std::env::var("AGENTHUB_LLM_LOG_PAYLOADS").is_ok() {
        if let Ok(json_str) = serde_json::to_string_pretty(body) {
            tracing::debug!(payload = %json_str, "Qwen request");
        }
    }
}

#[async_trait]
impl crate::client::LlmClient for QwenClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let messages = request
            .messages
            .into_iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::System => QwenRole::System,
                    Role::User => QwenRole::User,
                    Role::Assistant => QwenRole::Assistant,
                };
                QwenMessage::new(role, msg.content)
            })
            .collect();

        let qwen_request = QwenChatRequest {
            model: request.model,
            messages,
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: request.max_tokens,
            top_p: request.top_p.unwrap_or(DEFAULT_TOP_P),
        };

        let body = self.chat(qwen_request).await?;
        let usage = body.usage().cloned().unwrap_or_default();

        Ok(CompletionResponse {
            content: body.output_text(),
            role: Role::Assistant,
            usage: Usage {
                input_tokens: usage.input_tokens.unwrap_or(0),
                output_tokens: usage.output_tokens.unwrap_or(0),
                total_tokens: usage.total(),
            },
            stop_reason: body.finish_reason().map(str::to_string),
        })
    }

    fn provider_name(&self) -> &str {
        crate::providers::DASHSCOPE
    }

    fn model_name(&self) -> &str {
        crate::models::DEFAULT_MODEL_ID
    }
}
