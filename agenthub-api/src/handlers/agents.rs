use super::{now_timestamp, read_config};
use crate::error::ApiError;
use crate::helpers::agents::{new_agent_from_request, validate_update};
use crate::storage::{ExecutionCompletion, NewExecution, UpdateOutcome};
use crate::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse};
use agenthub_llm_sdk::model_metadata::estimate_cost;
use agenthub_llm_sdk::types::{CompletionRequest, Message};
use shared_types::{
    ActionResponse, Agent, AgentStatus, CreateAgentRequest, CreateAgentResponse,
    ExecuteAgentRequest, ExecuteAgentResponse, ExecutionStatus, UpdateAgentRequest,
};
use std::time::Instant;
use tracing::{error, info, warn};

#[get("/agents")]
pub async fn list_agents(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let agents = data.database.get_all_agents().map_err(|e| {
        error!(error = %e, "Failed to list agents");
        e
    })?;

    Ok(HttpResponse::Ok().json(agents))
}

#[post("/agents")]
pub async fn create_agent(
    data: web::Data<AppState>,
    request: web::Json<CreateAgentRequest>,
) -> Result<HttpResponse, ApiError> {
    let default_model = read_config(&data)?.qwen.default_model.clone();

    let new_agent = new_agent_from_request(request.into_inner(), &default_model).map_err(|e| {
        warn!(error = %e, "Rejected agent creation");
        e
    })?;
    let name = new_agent.name.clone();

    let agent_id = data.database.create_agent(new_agent).map_err(|e| {
        error!(error = %e, "Failed to create agent");
        e
    })?;
    info!(agent_id = %agent_id, name = %name, "Created agent");

    Ok(HttpResponse::Ok().json(CreateAgentResponse {
        success: true,
        agent_id,
        message: "Agent created".to_string(),
    }))
}

#[get("/agents/{id}")]
pub async fn get_agent(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let agent_id = path.into_inner();
    let agent = load_agent(&data, &agent_id)?;
    Ok(HttpResponse::Ok().json(agent))
}

#[put("/agents/{id}")]
pub async fn update_agent(
    data: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<UpdateAgentRequest>,
) -> Result<HttpResponse, ApiError> {
    let agent_id = path.into_inner();
    let update = request.into_inner();

    validate_update(&update).map_err(|e| {
        warn!(agent_id = %agent_id, error = %e, "Rejected agent update");
        e
    })?;
    apply_update(&data, &agent_id, &update)?;
    info!(agent_id = %agent_id, "Updated agent");

    Ok(HttpResponse::Ok().json(ActionResponse::ok("Agent updated")))
}

#[delete("/agents/{id}")]
pub async fn delete_agent(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let agent_id = path.into_inner();

    if !data.database.delete_agent(&agent_id)? {
        warn!(agent_id = %agent_id, "Agent not found");
        return Err(ApiError::agent_not_found(&agent_id));
    }
    info!(agent_id = %agent_id, "Deleted agent");

    Ok(HttpResponse::Ok().json(ActionResponse::ok("Agent deleted")))
}

#[post("/agents/{id}/activate")]
pub async fn activate_agent(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let agent_id = path.into_inner();
    apply_update(&data, &agent_id, &UpdateAgentRequest::status(AgentStatus::Active))?;
    info!(agent_id = %agent_id, "Activated agent");

    Ok(HttpResponse::Ok().json(ActionResponse::ok("Agent activated")))
}

#[post("/agents/{id}/deactivate")]
pub async fn deactivate_agent(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let agent_id = path.into_inner();
    apply_update(
        &data,
        &agent_id,
        &UpdateAgentRequest::status(AgentStatus::Inactive),
    )?;
    info!(agent_id = %agent_id, "Deactivated agent");

    Ok(HttpResponse::Ok().json(ActionResponse::ok("Agent deactivated")))
}

/// Run an active agent once: record a running execution, call the model,
/// then close the execution as success or error.
#[post("/agents/{id}/execute")]
pub async fn execute_agent(
    data: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<ExecuteAgentRequest>,
) -> Result<HttpResponse, ApiError> {
    let agent_id = path.into_inner();
    let input = request.into_inner().input;

    if input.trim().is_empty() {
        warn!(agent_id = %agent_id, "Rejected execution without input");
        return Err(ApiError::validation("Missing required field: input"));
    }

    let agent = load_agent(&data, &agent_id)?;
    if agent.status != AgentStatus::Active {
        warn!(agent_id = %agent_id, status = %agent.status, "Refused to execute inactive agent");
        return Err(ApiError::InvalidState(format!(
            "Agent {} is not active",
            agent_id
        )));
    }

    let execution_id = data.database.create_execution(NewExecution {
        agent_id: agent_id.clone(),
        input: input.clone(),
    })?;
    info!(
        agent_id = %agent_id,
        execution_id = %execution_id,
        model = %agent.model,
        "Executing agent"
    );

    let qwen_config = read_config(&data)?.qwen.clone();
    let client = data.llm_factory.create(&qwen_config);

    let mut request = CompletionRequest::new(
        agent.model.clone(),
        vec![
            Message::system(agent.system_prompt.clone()),
            Message::user(input.clone()),
        ],
    );
    request.max_tokens = agent.max_tokens;
    request.temperature = Some(agent.temperature as f32);

    let started = Instant::now();
    let result = match client {
        Ok(client) => client.complete(request).await,
        Err(e) => Err(e),
    };
    let duration = elapsed_ms(started);

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            error!(
                agent_id = %agent_id,
                execution_id = %execution_id,
                duration_ms = duration,
                upstream_status = ?e.status(),
                error = %e,
                "Agent execution failed"
            );
            record_failure(&data, &execution_id, duration, e.to_string());
            return Err(ApiError::Upstream(format!("Agent execution failed: {}", e)));
        }
    };

    let output = response.content;
    let cost = estimate_cost(&agent.model, response.usage.total_tokens);

    let completion = ExecutionCompletion {
        output: output.clone(),
        status: ExecutionStatus::Success,
        cost,
        duration_ms: duration,
    };
    if let Err(e) = data.database.update_execution(&execution_id, &completion) {
        error!(execution_id = %execution_id, error = %e, "Failed to record execution result");
        record_failure(&data, &execution_id, duration, e.to_string());
        return Err(e.into());
    }
    data.metrics.record_api_call(duration, cost, true);

    info!(
        agent_id = %agent_id,
        execution_id = %execution_id,
        model = %agent.model,
        duration_ms = duration,
        cost,
        total_tokens = response.usage.total_tokens,
        "Agent execution completed"
    );

    Ok(HttpResponse::Ok().json(ExecuteAgentResponse {
        execution_id,
        agent_id,
        input,
        output,
        cost,
        duration,
        model: agent.model,
        timestamp: now_timestamp(),
    }))
}

fn load_agent(data: &AppState, agent_id: &str) -> Result<Agent, ApiError> {
    match data.database.get_agent(agent_id) {
        Ok(Some(agent)) => Ok(agent),
        Ok(None) => {
            warn!(agent_id = %agent_id, "Agent not found");
            Err(ApiError::agent_not_found(agent_id))
        }
        Err(e) => {
            error!(agent_id = %agent_id, error = %e, "Failed to load agent");
            Err(e.into())
        }
    }
}

fn apply_update(
    data: &AppState,
    agent_id: &str,
    update: &UpdateAgentRequest,
) -> Result<(), ApiError> {
    match data.database.update_agent(agent_id, update) {
        Ok(UpdateOutcome::Updated) => Ok(()),
        Ok(UpdateOutcome::NotFound) => {
            warn!(agent_id = %agent_id, "Agent not found");
            Err(ApiError::agent_not_found(agent_id))
        }
        Err(e) => {
            error!(agent_id = %agent_id, error = %e, "Failed to update agent");
            Err(e.into())
        }
    }
}

/// Count a failed call and close the execution as `error`, if storage allows
fn record_failure(data: &AppState, execution_id: &str, duration: u64, message: String) {
    data.metrics.record_api_call(duration, 0.0, false);

    let failure = ExecutionCompletion {
        output: message,
        status: ExecutionStatus::Error,
        cost: 0.0,
        duration_ms: duration,
    };
    if let Err(e) = data.database.update_execution(execution_id, &failure) {
        error!(
            execution_id = %execution_id,
            error = %e,
            "Failed to record execution failure"
        );
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
