//! Route table shared by the server binary and the integration tests.

use crate::error::ApiError;
use crate::handlers::{agents, executions, health, metrics, models, settings};
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::ErrorResponse;

/// Upper bound for JSON request bodies
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(health::health_check)
        .service(
            web::scope("/api")
                .service(agents::list_agents)
                .service(agents::create_agent)
                .service(agents::get_agent)
                .service(agents::update_agent)
                .service(agents::delete_agent)
                .service(agents::activate_agent)
                .service(agents::deactivate_agent)
                .service(agents::execute_agent)
                .service(executions::list_executions)
                .service(settings::update_qwen_key)
                .service(settings::get_config_status)
                .service(models::list_models)
                .service(metrics::get_metrics)
                .service(metrics::reset_metrics),
        )
        .default_service(web::to(not_found));
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            let response = match &err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    HttpResponse::PayloadTooLarge().json(ErrorResponse::new(err.to_string()))
                }
                _ => HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string())),
            };
            InternalError::from_response(err, response).into()
        })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    tracing::debug!(path = %req.path(), "No route matched");
    Err(ApiError::NotFound("Not found".to_string()))
}
