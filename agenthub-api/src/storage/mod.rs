//! SQLite persistence for agents and executions.

mod columns;
mod sqlite;

pub use columns::{AgentColumn, ExecutionColumn, ExecutionCompletion};
pub use sqlite::{Database, NewAgent, NewExecution};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Storage operation failed: {0}")]
    OperationFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result of a patch against a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The row exists; an empty patch still counts as updated
    Updated,
    NotFound,
}
