use ts_rs::TS;

/// Names accepted by [`generate_typescript_definitions`], in output order
pub const API_TYPE_NAMES: &[&str] = &[
    "AgentStatus",
    "Agent",
    "CreateAgentRequest",
    "UpdateAgentRequest",
    "CreateAgentResponse",
    "ActionResponse",
    "ExecuteAgentRequest",
    "ExecuteAgentResponse",
    "ExecutionStatus",
    "Execution",
    "ExecutionListQuery",
    "ModelInfo",
    "MetricsSnapshot",
    "HealthResponse",
    "UpdateQwenKeyRequest",
    "UpdateQwenKeyResponse",
    "ConfigStatusResponse",
    "ErrorResponse",
];

pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let type_def = export_type(name)?;
        let cleaned = clean_type(type_def);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    use crate::*;

    let result = match name {
        "AgentStatus" => AgentStatus::export_to_string()?,
        "Agent" => Agent::export_to_string()?,
        "CreateAgentRequest" => CreateAgentRequest::export_to_string()?,
        "UpdateAgentRequest" => UpdateAgentRequest::export_to_string()?,
        "CreateAgentResponse" => CreateAgentResponse::export_to_string()?,
        "ActionResponse" => ActionResponse::export_to_string()?,
        "ExecuteAgentRequest" => ExecuteAgentRequest::export_to_string()?,
        "ExecuteAgentResponse" => ExecuteAgentResponse::export_to_string()?,

        "ExecutionStatus" => ExecutionStatus::export_to_string()?,
        "Execution" => Execution::export_to_string()?,
        "ExecutionListQuery" => ExecutionListQuery::export_to_string()?,

        "ModelInfo" => ModelInfo::export_to_string()?,
        "MetricsSnapshot" => MetricsSnapshot::export_to_string()?,

        "HealthResponse" => HealthResponse::export_to_string()?,
        "UpdateQwenKeyRequest" => UpdateQwenKeyRequest::export_to_string()?,
        "UpdateQwenKeyResponse" => UpdateQwenKeyResponse::export_to_string()?,
        "ConfigStatusResponse" => ConfigStatusResponse::export_to_string()?,

        "ErrorResponse" => ErrorResponse::export_to_string()?,

        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in shared-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .cloned()
        .collect();

    filtered.join("\n").trim().to_string()
}
