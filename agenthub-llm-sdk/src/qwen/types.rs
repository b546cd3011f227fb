use serde::{Deserialize, Serialize};

/// Placeholder returned when a recognized response carries no text
pub const NO_RESPONSE_CONTENT: &str = "no response content";

/// Which DashScope endpoint family the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QwenApiMode {
    /// `/api/v1/services/aigc/text-generation/generation`, answers `{output:{text}}`
    #[default]
    Native,
    /// `/compatible-mode/v1/chat/completions`, answers `{choices:[{message}]}`
    Compatible,
}

impl std::str::FromStr for QwenApiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(QwenApiMode::Native),
            "compatible" => Ok(QwenApiMode::Compatible),
            other => Err(format!(
                "Unknown Qwen API mode '{}', expected 'native' or 'compatible'",
                other
            )),
        }
    }
}

/// Role of a Qwen message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QwenRole {
    System,
    User,
    Assistant,
}

/// A message in the Qwen conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QwenMessage {
    pub role: QwenRole,
    pub content: String,
}

impl QwenMessage {
    pub fn new<S: Into<String>>(role: QwenRole, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(QwenRole::System, content)
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(QwenRole::User, content)
    }
}

/// Mode-independent chat request; converted to the wire body of the
/// configured [`QwenApiMode`] when sent.
#[derive(Debug, Clone, PartialEq)]
pub struct QwenChatRequest {
    pub model: String,
    pub messages: Vec<QwenMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// Native generation request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QwenGenerationRequest {
    pub model: String,
    pub input: QwenGenerationInput,
    pub parameters: QwenParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QwenGenerationInput {
    pub messages: Vec<QwenMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QwenParameters {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// OpenAI-compatible chat completion request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QwenChatCompletionRequest {
    pub model: String,
    pub messages: Vec<QwenMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stream: bool,
}

impl From<QwenChatRequest> for QwenGenerationRequest {
    fn from(request: QwenChatRequest) -> Self {
        Self {
            model: request.model,
            input: QwenGenerationInput {
                messages: request.messages,
            },
            parameters: QwenParameters {
                temperature: request.temperature,
                max_tokens: request.max_tokens,
                top_p: request.top_p,
            },
        }
    }
}

impl From<QwenChatRequest> for QwenChatCompletionRequest {
    fn from(request: QwenChatRequest) -> Self {
        Self {
            model: request.model,
            messages: request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            stream: false,
        }
    }
}

/// Token usage. Native mode reports `input_tokens`/`output_tokens`,
/// compatible mode `prompt_tokens`/`completion_tokens`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QwenUsage {
    #[serde(default, alias = "prompt_tokens")]
    pub input_tokens: Option<u32>,
    #[serde(default, alias = "completion_tokens")]
    pub output_tokens: Option<u32>,
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

impl QwenUsage {
    /// Reported total, or the sum of the parts when the total is absent
    pub fn total(&self) -> u32 {
        self.total_tokens.unwrap_or_else(|| {
            self.input_tokens
                .unwrap_or(0)
                .saturating_add(self.output_tokens.unwrap_or(0))
        })
    }
}

/// Shape A: native generation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QwenGenerationResponse {
    pub output: QwenGenerationOutput,
    /// Some gateways echo compatible-mode choices alongside `output`
    #[serde(default)]
    pub choices: Vec<QwenChoice>,
    #[serde(default)]
    pub usage: Option<QwenUsage>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QwenGenerationOutput {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Shape B: OpenAI-compatible chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QwenChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<QwenChoice>,
    #[serde(default)]
    pub usage: Option<QwenUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QwenChoice {
    #[serde(default)]
    pub index: Option<u32>,
    pub message: QwenChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QwenChoiceMessage {
    #[serde(default)]
    pub role: Option<QwenRole>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A successful provider response in one of the two known shapes.
///
/// A body matching neither shape fails to deserialize, so unrecognized
/// responses surface as [`crate::error::LlmError::Parse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QwenResponseBody {
    Generation(QwenGenerationResponse),
    ChatCompletion(QwenChatCompletionResponse),
}

impl QwenResponseBody {
    /// Reply text, if the response carries any: `output.text` first, then
    /// the first choice's message content.
    pub fn text(&self) -> Option<&str> {
        match self {
            QwenResponseBody::Generation(response) => non_empty(response.output.text.as_deref())
                .or_else(|| first_choice_text(&response.choices)),
            QwenResponseBody::ChatCompletion(response) => first_choice_text(&response.choices),
        }
    }

    /// Reply text, or [`NO_RESPONSE_CONTENT`] when the response has none
    pub fn output_text(&self) -> String {
        self.text().unwrap_or(NO_RESPONSE_CONTENT).to_string()
    }

    pub fn usage(&self) -> Option<&QwenUsage> {
        match self {
            QwenResponseBody::Generation(response) => response.usage.as_ref(),
            QwenResponseBody::ChatCompletion(response) => response.usage.as_ref(),
        }
    }

    /// Total tokens billed, 0 when usage is missing
    pub fn total_tokens(&self) -> u32 {
        self.usage().map(QwenUsage::total).unwrap_or(0)
    }

    pub fn finish_reason(&self) -> Option<&str> {
        match self {
            QwenResponseBody::Generation(response) => response.output.finish_reason.as_deref(),
            QwenResponseBody::ChatCompletion(response) => response
                .choices
                .first()
                .and_then(|choice| choice.finish_reason.as_deref()),
        }
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

fn first_choice_text(choices: &[QwenChoice]) -> Option<&str> {
    non_empty(
        choices
            .first()
            .and_then(|choice| choice.message.content.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_generation_shape() {
        let body: QwenResponseBody = serde_json::from_value(json!({
            "output": { "text": "Hello there", "finish_reason": "stop" },
            "usage": { "input_tokens": 12, "output_tokens": 3, "total_tokens": 15 },
            "request_id": "req-1"
        }))
        .unwrap();

        assert!(matches!(body, QwenResponseBody::Generation(_)));
        assert_eq!(body.output_text(), "Hello there");
        assert_eq!(body.total_tokens(), 15);
        assert_eq!(body.finish_reason(), Some("stop"));
    }

    #[test]
    fn test_parse_chat_completion_shape() {
        let body: QwenResponseBody = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "Hi" }, "finish_reason": "stop" }],
            "usage": { "prompt_tokens": 7, "completion_tokens": 1, "total_tokens": 8 }
        }))
        .unwrap();

        assert!(matches!(body, QwenResponseBody::ChatCompletion(_)));
        assert_eq!(body.output_text(), "Hi");
        assert_eq!(body.total_tokens(), 8);
    }

    #[test]
    fn test_missing_text_falls_back_to_placeholder() {
        let empty_output: QwenResponseBody =
            serde_json::from_value(json!({ "output": {} })).unwrap();
        assert_eq!(empty_output.output_text(), NO_RESPONSE_CONTENT);
        assert_eq!(empty_output.total_tokens(), 0);

        let no_choices: QwenResponseBody =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert_eq!(no_choices.output_text(), NO_RESPONSE_CONTENT);

        let empty_text: QwenResponseBody =
            serde_json::from_value(json!({ "output": { "text": "" } })).unwrap();
        assert_eq!(empty_text.output_text(), NO_RESPONSE_CONTENT);
    }

    #[test]
    fn test_empty_output_falls_through_to_choices() {
        let body: QwenResponseBody = serde_json::from_value(json!({
            "output": {},
            "choices": [{ "message": { "content": "hi" } }]
        }))
        .unwrap();
        assert_eq!(body.output_text(), "hi");

        let blank_text: QwenResponseBody = serde_json::from_value(json!({
            "output": { "text": "" },
            "choices": [{ "message": { "content": "from choices" } }]
        }))
        .unwrap();
        assert_eq!(blank_text.output_text(), "from choices");

        let both: QwenResponseBody = serde_json::from_value(json!({
            "output": { "text": "from output" },
            "choices": [{ "message": { "content": "from choices" } }]
        }))
        .unwrap();
        assert_eq!(both.output_text(), "from output");
    }

    #[test]
    fn test_unrecognized_shape_is_an_error() {
        let result: Result<QwenResponseBody, _> =
            serde_json::from_value(json!({ "result": "something else" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_usage_total_computed_from_parts() {
        let usage = QwenUsage {
            input_tokens: Some(10),
            output_tokens: Some(5),
            total_tokens: None,
        };
        assert_eq!(usage.total(), 15);
    }

    #[test]
    fn test_api_mode_from_str() {
        assert_eq!("native".parse::<QwenApiMode>(), Ok(QwenApiMode::Native));
        assert_eq!("Compatible".parse::<QwenApiMode>(), Ok(QwenApiMode::Compatible));
        assert!("sse".parse::<QwenApiMode>().is_err());
    }

    #[test]
    fn test_generation_request_wire_format() {
        let request = QwenChatRequest {
            model: "qwen-plus".to_string(),
            messages: vec![QwenMessage::system("Be brief."), QwenMessage::user("Hi")],
            temperature: 0.5,
            max_tokens: 256,
            top_p: 0.8,
        };

        let value = serde_json::to_value(QwenGenerationRequest::from(request)).unwrap();
        assert_eq!(value["model"], "qwen-plus");
        assert_eq!(value["input"]["messages"][0]["role"], "system");
        assert_eq!(value["input"]["messages"][1]["content"], "Hi");
        assert_eq!(value["parameters"]["max_tokens"], 256);
    }
}
