use crate::{
    error::LlmError,
    qwen::{
        client::QwenClient,
        types::{QwenChatRequest, QwenMessage, QwenResponseBody, QwenRole},
    },
    types::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P},
};

/// Builder for Qwen chat requests
pub struct QwenMessageBuilder<'a> {
    client: &'a QwenClient,
    model: Option<String>,
    messages: Vec<QwenMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

impl<'a> QwenMessageBuilder<'a> {
    /// Create a new message builder
    pub fn new(client: &'a QwenClient) -> Self {
        Self {
            client,
            model: None,
            messages: Vec::new(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: DEFAULT_TOP_P,
        }
    }

    /// Set the model to use
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature for randomness
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the top-p sampling parameter
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Add a message to the conversation
    ///
    /// Valid roles: "system", "user", "assistant". Anything else is sent as "user".
    pub fn message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        let role_str = role.into();
        let role = match role_str.as_str() {
            "system" => QwenRole::System,
            "user" => QwenRole::User,
            "assistant" => QwenRole::Assistant,
            _ => {
                tracing::warn!("Invalid role '{}', defaulting to 'user'", role_str);
                QwenRole::User
            }
        };

        self.messages.push(QwenMessage::new(role, content));
        self
    }

    /// Add a system message
    pub fn system_message(self, content: impl Into<String>) -> Self {
        self.message("system", content)
    }

    /// Add a user message
    pub fn user_message(self, content: impl Into<String>) -> Self {
        self.message("user", content)
    }

    /// Add an assistant message
    pub fn assistant_message(self, content: impl Into<String>) -> Self {
        self.message("assistant", content)
    }

    /// Assemble the request without sending it
    pub fn build(self) -> Result<QwenChatRequest, LlmError> {
        if self.messages.is_empty() {
            return Err(LlmError::invalid_request("At least one message is required"));
        }

        Ok(QwenChatRequest {
            model: self
                .model
                .ok_or_else(|| LlmError::invalid_request("Model must be specified"))?,
            messages: self.messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
        })
    }

    /// Send the request and get the response
    pub async fn send(self) -> Result<QwenResponseBody, LlmError> {
        let client = self.client;
        let request = self.build()?;
        client.chat(request).await
    }
}
