use crate::error::ApiError;
use crate::AppState;
use actix_web::{get, web, HttpResponse};
use shared_types::ExecutionListQuery;
use tracing::info;

pub const DEFAULT_EXECUTION_LIMIT: u32 = 50;
pub const MAX_EXECUTION_LIMIT: u32 = 500;

#[get("/executions")]
pub async fn list_executions(
    data: web::Data<AppState>,
    query: web::Query<ExecutionListQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let agent_id = query.agent_id.as_deref().filter(|id| !id.is_empty());
    let limit = query
        .limit
        .unwrap_or(DEFAULT_EXECUTION_LIMIT)
        .clamp(1, MAX_EXECUTION_LIMIT);

    let executions = data.database.get_executions(agent_id, limit)?;
    info!(
        agent_id = agent_id.unwrap_or("*"),
        limit,
        count = executions.len(),
        "Listed executions"
    );

    Ok(HttpResponse::Ok().json(executions))
}
