use crate::error::ApiError;
use crate::storage::NewAgent;
use agenthub_llm_sdk::model_metadata::is_supported_model;
use agenthub_llm_sdk::types::DEFAULT_MAX_TOKENS;
use shared_types::{AgentStatus, CreateAgentRequest, UpdateAgentRequest};

pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 2.0;
pub const DEFAULT_AGENT_TEMPERATURE: f64 = 0.7;

/// Validate a create request and fill in defaults. New agents start inactive.
pub fn new_agent_from_request(
    request: CreateAgentRequest,
    default_model: &str,
) -> Result<NewAgent, ApiError> {
    let mut missing = Vec::new();
    if request.name.trim().is_empty() {
        missing.push("name");
    }
    if request.system_prompt.trim().is_empty() {
        missing.push("systemPrompt");
    }
    match missing.len() {
        0 => {}
        1 => {
            return Err(ApiError::validation(format!(
                "Missing required field: {}",
                missing[0]
            )))
        }
        _ => {
            return Err(ApiError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    let model = request
        .model
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| default_model.to_string());
    validate_model(&model)?;

    let temperature = request.temperature.unwrap_or(DEFAULT_AGENT_TEMPERATURE);
    validate_temperature(temperature)?;

    let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
    validate_max_tokens(max_tokens)?;

    Ok(NewAgent {
        name: request.name,
        description: request.description,
        model,
        system_prompt: request.system_prompt,
        temperature,
        max_tokens,
        tools: request.tools.unwrap_or_default(),
        status: AgentStatus::Inactive,
    })
}

pub fn validate_update(update: &UpdateAgentRequest) -> Result<(), ApiError> {
    if matches!(&update.name, Some(name) if name.trim().is_empty()) {
        return Err(ApiError::validation("Field name must not be empty"));
    }
    if matches!(&update.system_prompt, Some(prompt) if prompt.trim().is_empty()) {
        return Err(ApiError::validation("Field systemPrompt must not be empty"));
    }
    if let Some(model) = &update.model {
        validate_model(model)?;
    }
    if let Some(temperature) = update.temperature {
        validate_temperature(temperature)?;
    }
    if let Some(max_tokens) = update.max_tokens {
        validate_max_tokens(max_tokens)?;
    }
    Ok(())
}

fn validate_model(model: &str) -> Result<(), ApiError> {
    if is_supported_model(model) {
        Ok(())
    } else {
        Err(ApiError::validation(format!("Unsupported model: {}", model)))
    }
}

fn validate_temperature(temperature: f64) -> Result<(), ApiError> {
    if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Field temperature must be between {} and {}",
            MIN_TEMPERATURE, MAX_TEMPERATURE
        )))
    }
}

fn validate_max_tokens(max_tokens: u32) -> Result<(), ApiError> {
    if max_tokens >= 1 {
        Ok(())
    } else {
        Err(ApiError::validation("Field maxTokens must be at least 1"))
    }
}
