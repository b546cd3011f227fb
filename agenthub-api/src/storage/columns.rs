use rusqlite::types::Value;
use shared_types::{AgentStatus, ExecutionStatus, UpdateAgentRequest};

use super::StorageError;

/// Writable columns of the `agents` table. `id` and `created_at` are
/// deliberately absent: they can never be patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentColumn {
    Name,
    Description,
    Model,
    SystemPrompt,
    Temperature,
    MaxTokens,
    Tools,
    Status,
    UpdatedAt,
}

impl AgentColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            AgentColumn::Name => "name",
            AgentColumn::Description => "description",
            AgentColumn::Model => "model",
            AgentColumn::SystemPrompt => "system_prompt",
            AgentColumn::Temperature => "temperature",
            AgentColumn::MaxTokens => "max_tokens",
            AgentColumn::Tools => "tools",
            AgentColumn::Status => "status",
            AgentColumn::UpdatedAt => "updated_at",
        }
    }

    /// Column/value pairs for the fields present in `update`, in a fixed order.
    /// `updated_at` is not included; the caller stamps it.
    pub fn assignments(
        update: &UpdateAgentRequest,
    ) -> Result<Vec<(AgentColumn, Value)>, StorageError> {
        let mut assignments = Vec::new();

        if let Some(name) = &update.name {
            assignments.push((AgentColumn::Name, Value::Text(name.clone())));
        }
        if let Some(description) = &update.description {
            assignments.push((AgentColumn::Description, Value::Text(description.clone())));
        }
        if let Some(model) = &update.model {
            assignments.push((AgentColumn::Model, Value::Text(model.clone())));
        }
        if let Some(system_prompt) = &update.system_prompt {
            assignments.push((
                AgentColumn::SystemPrompt,
                Value::Text(system_prompt.clone()),
            ));
        }
        if let Some(temperature) = update.temperature {
            assignments.push((AgentColumn::Temperature, Value::Real(temperature)));
        }
        if let Some(max_tokens) = update.max_tokens {
            assignments.push((AgentColumn::MaxTokens, Value::Integer(i64::from(max_tokens))));
        }
        if let Some(tools) = &update.tools {
            assignments.push((AgentColumn::Tools, Value::Text(serde_json::to_string(tools)?)));
        }
        if let Some(status) = update.status {
            assignments.push((AgentColumn::Status, status_value(status)));
        }

        Ok(assignments)
    }
}

fn status_value(status: AgentStatus) -> Value {
    Value::Text(status.as_str().to_string())
}

/// Columns of the `executions` table that change when a run completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionColumn {
    Output,
    Status,
    Cost,
    Duration,
}

impl ExecutionColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            ExecutionColumn::Output => "output",
            ExecutionColumn::Status => "status",
            ExecutionColumn::Cost => "cost",
            ExecutionColumn::Duration => "duration",
        }
    }
}

/// Completion data written once to a running execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionCompletion {
    pub output: String,
    pub status: ExecutionStatus,
    pub cost: f64,
    pub duration_ms: u64,
}

impl ExecutionCompletion {
    pub fn assignments(&self) -> Vec<(ExecutionColumn, Value)> {
        vec![
            (ExecutionColumn::Output, Value::Text(self.output.clone())),
            (
                ExecutionColumn::Status,
                Value::Text(self.status.as_str().to_string()),
            ),
            (ExecutionColumn::Cost, Value::Real(self.cost)),
            (
                ExecutionColumn::Duration,
                Value::Integer(i64::try_from(self.duration_ms).unwrap_or(i64::MAX)),
            ),
        ]
    }
}
