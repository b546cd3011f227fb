use super::{read_config, write_config};
use crate::error::ApiError;
use crate::AppState;
use actix_web::{get, post, web, HttpResponse};
use shared_types::{ConfigStatusResponse, UpdateQwenKeyRequest, UpdateQwenKeyResponse};
use tracing::{info, warn};

pub const QWEN_KEY_PREFIX: &str = "sk-";

/// First 8 and last 4 characters around an ellipsis
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let prefix: String = chars.iter().take(8).collect();
    let suffix: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

#[post("/config/qwen-key")]
pub async fn update_qwen_key(
    data: web::Data<AppState>,
    request: web::Json<UpdateQwenKeyRequest>,
) -> Result<HttpResponse, ApiError> {
    let api_key = request.into_inner().api_key;

    if api_key.trim().is_empty() {
        warn!("Rejected empty Qwen API key");
        return Err(ApiError::validation("Missing required field: apiKey"));
    }
    if !api_key.starts_with(QWEN_KEY_PREFIX) {
        warn!("Rejected Qwen API key with invalid format");
        return Err(ApiError::validation(format!(
            "Invalid API key format: expected prefix {}",
            QWEN_KEY_PREFIX
        )));
    }

    let masked_key = mask_api_key(&api_key);
    write_config(&data)?.qwen.api_key = Some(api_key);
    info!(masked_key = %masked_key, "Updated Qwen API key");

    Ok(HttpResponse::Ok().json(UpdateQwenKeyResponse {
        success: true,
        message: "API key configured".to_string(),
        masked_key,
    }))
}

#[get("/config/status")]
pub async fn get_config_status(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let config = read_config(&data)?;
    let key = config.qwen_api_key();

    Ok(HttpResponse::Ok().json(ConfigStatusResponse {
        qwen_api_key_configured: key.is_some(),
        qwen_api_key_hint: key.map(mask_api_key),
    }))
}
