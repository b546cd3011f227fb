use super::{now_timestamp, read_config};
use crate::error::ApiError;
use crate::AppState;
use actix_web::{get, web, HttpResponse};
use shared_types::HealthResponse;

#[get("/health")]
pub async fn health_check(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let config = read_config(&data)?;

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: now_timestamp(),
        environment: config.environment.clone(),
        qwen_api_key_configured: config.qwen_api_key().is_some(),
        port: config.server.port,
    }))
}
