use std::sync::{Arc, RwLock};

pub mod config;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod storage;

use config::ApiConfig;
use helpers::llm::LlmClientFactory;
use metrics::MetricsCollector;
use storage::Database;

/// Shared state handed to every handler
pub struct AppState {
    pub config: Arc<RwLock<ApiConfig>>,
    pub database: Arc<Database>,
    pub metrics: Arc<MetricsCollector>,
    pub llm_factory: Arc<dyn LlmClientFactory>,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        database: Arc<Database>,
        llm_factory: Arc<dyn LlmClientFactory>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            database,
            metrics: Arc::new(MetricsCollector::new()),
            llm_factory,
        }
    }
}
