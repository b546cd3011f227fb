use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod agent;
pub mod execution;
pub mod metrics;
pub mod model;
pub mod settings;
pub mod typescript_gen;

pub use typescript_gen::generate_typescript_definitions;

pub use agent::{
    ActionResponse, Agent, AgentStatus, CreateAgentRequest, CreateAgentResponse,
    ExecuteAgentRequest, ExecuteAgentResponse, UpdateAgentRequest,
};
pub use execution::{Execution, ExecutionListQuery, ExecutionStatus};
pub use metrics::MetricsSnapshot;
pub use model::ModelInfo;
pub use settings::{
    ConfigStatusResponse, HealthResponse, UpdateQwenKeyRequest, UpdateQwenKeyResponse,
};

// Shared wire types for agenthub-api and the admin page

/// Body of every non-2xx JSON response
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
