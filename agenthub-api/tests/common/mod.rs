#![allow(dead_code)]

use actix_web::{test, web, App};
use agenthub_api::config::{ApiConfig, QwenConfig};
use agenthub_api::helpers::llm::LlmClientFactory;
use agenthub_api::middleware::EnsureTables;
use agenthub_api::routes::configure_routes;
use agenthub_api::storage::Database;
use agenthub_api::AppState;
use agenthub_llm_sdk::client::LlmClient;
use agenthub_llm_sdk::error::LlmError;
use agenthub_llm_sdk::types::{CompletionRequest, CompletionResponse, Role, Usage};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub struct TestApp<S> {
    pub state: web::Data<AppState>,
    pub mock_llm_client: Arc<MockLlmClient>,
    pub factory: Arc<MockLlmClientFactory>,
    pub app: S,
}

pub struct MockLlmClient {
    pub responses: Mutex<VecDeque<CompletionResponse>>,
    pub failure: Mutex<Option<(u16, String)>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
    pub call_count: Mutex<usize>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        MockLlmClient {
            responses: Mutex::new(VecDeque::new()),
            failure: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            call_count: Mutex::new(0),
        }
    }

    pub fn push_response(&self, response: CompletionResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Every following call fails with this provider status and body
    pub fn fail_with(&self, status: u16, body: &str) {
        *self.failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        self.requests.lock().unwrap().push(request);

        if let Some((status, body)) = self.failure.lock().unwrap().clone() {
            return Err(LlmError::api_error(status, body));
        }

        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| create_completion_response_with_text("Hello from mock", 1000)))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Hands out the shared mock and remembers which key it was asked to use
pub struct MockLlmClientFactory {
    pub client: Arc<MockLlmClient>,
    pub seen_api_keys: Mutex<Vec<Option<String>>>,
}

impl LlmClientFactory for MockLlmClientFactory {
    fn create(&self, config: &QwenConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
        self.seen_api_keys
            .lock()
            .unwrap()
            .push(config.api_key.clone());
        Ok(self.client.clone() as Arc<dyn LlmClient>)
    }
}

pub fn test_config() -> ApiConfig {
    let mut config = ApiConfig::default();
    config.environment = "test".to_string();
    config.qwen.api_key = Some("sk-test-key-0000abcd".to_string());
    config
}

pub fn create_completion_response_with_text(text: &str, total_tokens: u32) -> CompletionResponse {
    CompletionResponse {
        content: text.to_string(),
        role: Role::Assistant,
        usage: Usage {
            input_tokens: total_tokens / 2,
            output_tokens: total_tokens - total_tokens / 2,
            total_tokens,
        },
        stop_reason: Some("stop".to_string()),
    }
}

pub async fn setup_test_app() -> anyhow::Result<
    TestApp<
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    >,
> {
    let mock_llm_client = Arc::new(MockLlmClient::new());
    let factory = Arc::new(MockLlmClientFactory {
        client: mock_llm_client.clone(),
        seen_api_keys: Mutex::new(Vec::new()),
    });

    let state = web::Data::new(AppState::new(
        test_config(),
        Arc::new(Database::in_memory()),
        factory.clone() as Arc<dyn LlmClientFactory>,
    ));

    let app = setup_app_with_state(state.clone()).await;

    Ok(TestApp {
        state,
        mock_llm_client,
        factory,
        app,
    })
}

pub async fn setup_app_with_state(
    state: web::Data<AppState>,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(EnsureTables)
            .configure(configure_routes),
    )
    .await
}

pub fn agent_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Test agent",
        "systemPrompt": "You are a helpful assistant.",
        "tools": ["search", "calculator"]
    })
}

/// Create an agent through the API and return its id
pub async fn create_agent<S>(app: &S, body: Value) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post()
        .uri("/api/agents")
        .set_json(&body)
        .to_request();
    let resp: Value = test::call_and_read_body_json(app, req).await;
    resp["agentId"]
        .as_str()
        .expect("agentId in create response")
        .to_string()
}

pub async fn activate_agent<S>(app: &S, agent_id: &str)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/agents/{}/activate", agent_id))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "activate failed: {}", resp.status());
}
