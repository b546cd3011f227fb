pub mod agents;
pub mod executions;
pub mod health;
pub mod metrics;
pub mod models;
pub mod settings;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::AppState;
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

fn read_config(state: &AppState) -> Result<RwLockReadGuard<'_, ApiConfig>, ApiError> {
    state
        .config
        .read()
        .map_err(|e| ApiError::Internal(format!("Failed to acquire config read lock: {}", e)))
}

fn write_config(state: &AppState) -> Result<RwLockWriteGuard<'_, ApiConfig>, ApiError> {
    state
        .config
        .write()
        .map_err(|e| ApiError::Internal(format!("Failed to acquire config write lock: {}", e)))
}

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
