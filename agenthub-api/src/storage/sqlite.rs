use super::columns::{AgentColumn, ExecutionCompletion};
use super::{StorageError, UpdateOutcome};
use chrono::{SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use shared_types::{Agent, AgentStatus, Execution, ExecutionStatus, UpdateAgentRequest};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

const IN_MEMORY: &str = ":memory:";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS agents (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    model TEXT NOT NULL,
    system_prompt TEXT NOT NULL,
    temperature REAL NOT NULL DEFAULT 0.7,
    max_tokens INTEGER NOT NULL DEFAULT 2048,
    tools TEXT NOT NULL DEFAULT '[]',
    status TEXT NOT NULL DEFAULT 'inactive',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS executions (
    id TEXT PRIMARY KEY,
    agent_id TEXT NOT NULL,
    input TEXT NOT NULL,
    output TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'running',
    cost REAL NOT NULL DEFAULT 0,
    duration INTEGER NOT NULL DEFAULT 0,
    timestamp TEXT NOT NULL,
    FOREIGN KEY (agent_id) REFERENCES agents (id)
);

CREATE INDEX IF NOT EXISTS idx_executions_agent_timestamp
    ON executions (agent_id, timestamp DESC);
"#;

const AGENT_COLUMNS: &str = "id, name, description, model, system_prompt, temperature, \
                             max_tokens, tools, status, created_at, updated_at";

const EXECUTION_COLUMNS: &str = "id, agent_id, input, output, status, cost, duration, timestamp";

/// Fields of an agent about to be inserted; id and timestamps are assigned
/// by [`Database::create_agent`].
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub name: String,
    pub description: Option<String>,
    pub model: String,
    pub system_prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub tools: Vec<String>,
    pub status: AgentStatus,
}

/// A run about to start. It is always stored as `running` with empty output.
#[derive(Debug, Clone)]
pub struct NewExecution {
    pub agent_id: String,
    pub input: String,
}

struct DbState {
    connection: Option<Connection>,
    tables_ready: bool,
}

impl DbState {
    fn connection(&self) -> Result<&Connection, StorageError> {
        self.connection
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("connection is not open".to_string()))
    }
}

/// Single shared SQLite connection, opened on first use
pub struct Database {
    path: PathBuf,
    state: Mutex<DbState>,
}

impl Database {
    /// Does not touch the filesystem; the connection is opened lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(DbState {
                connection: None,
                tables_ready: false,
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    fn lock(&self) -> Result<MutexGuard<'_, DbState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::OperationFailed(format!("Lock error: {}", e)))
    }

    /// Lock the state, opening the connection if this is the first use
    fn open(&self) -> Result<MutexGuard<'_, DbState>, StorageError> {
        let mut state = self.lock()?;

        if state.connection.is_none() {
            if self.path != Path::new(IN_MEMORY) {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StorageError::Unavailable(format!(
                            "cannot create {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
            }

            let conn = Connection::open(&self.path).map_err(|e| {
                StorageError::Unavailable(format!("cannot open {}: {}", self.path.display(), e))
            })?;
            info!(path = %self.path.display(), "Opened database");
            state.connection = Some(conn);
        }

        Ok(state)
    }

    /// Create the tables if they do not exist. A no-op after the first success.
    pub fn initialize_tables(&self) -> Result<(), StorageError> {
        let mut state = self.open()?;
        if state.tables_ready {
            return Ok(());
        }

        state.connection()?.execute_batch(SCHEMA)?;
        state.tables_ready = true;
        info!("Database tables initialized");

        Ok(())
    }

    pub fn create_agent(&self, agent: NewAgent) -> Result<String, StorageError> {
        let state = self.open()?;
        let conn = state.connection()?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = now_timestamp();
        let tools_json = serde_json::to_string(&agent.tools)?;

        conn.execute(
            r#"
            INSERT INTO agents (
                id, name, description, model, system_prompt,
                temperature, max_tokens, tools, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                id,
                agent.name,
                agent.description,
                agent.model,
                agent.system_prompt,
                agent.temperature,
                agent.max_tokens,
                tools_json,
                agent.status.as_str(),
                now,
                now,
            ],
        )?;

        Ok(id)
    }

    pub fn get_agent(&self, id: &str) -> Result<Option<Agent>, StorageError> {
        let state = self.open()?;
        let conn = state.connection()?;

        let agent = conn
            .query_row(
                &format!("SELECT {} FROM agents WHERE id = ?1", AGENT_COLUMNS),
                params![id],
                agent_from_row,
            )
            .optional()?;

        Ok(agent)
    }

    /// Most recently created first
    pub fn get_all_agents(&self) -> Result<Vec<Agent>, StorageError> {
        let state = self.open()?;
        let conn = state.connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM agents ORDER BY created_at DESC, rowid DESC",
            AGENT_COLUMNS
        ))?;
        let agents = stmt
            .query_map([], agent_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(agents)
    }

    /// Apply the fields present in `update` and stamp `updated_at`.
    ///
    /// An update with no applicable fields leaves the row untouched and
    /// reports whether it exists.
    pub fn update_agent(
        &self,
        id: &str,
        update: &UpdateAgentRequest,
    ) -> Result<UpdateOutcome, StorageError> {
        let assignments = AgentColumn::assignments(update)?;

        let state = self.open()?;
        let conn = state.connection()?;

        if assignments.is_empty() {
            let exists = conn
                .query_row("SELECT 1 FROM agents WHERE id = ?1", params![id], |_| Ok(()))
                .optional()?
                .is_some();
            return Ok(outcome(exists));
        }

        let mut set_clauses: Vec<String> = assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column.column_name()))
            .collect();
        set_clauses.push(format!("{} = ?", AgentColumn::UpdatedAt.column_name()));

        let mut values: Vec<Value> = assignments.into_iter().map(|(_, value)| value).collect();
        values.push(Value::Text(now_timestamp()));
        values.push(Value::Text(id.to_string()));

        let sql = format!("UPDATE agents SET {} WHERE id = ?", set_clauses.join(", "));
        let changed = conn.execute(&sql, params_from_iter(values.iter()))?;

        Ok(outcome(changed > 0))
    }

    /// Returns false when no agent had this id
    pub fn delete_agent(&self, id: &str) -> Result<bool, StorageError> {
        let state = self.open()?;
        let conn = state.connection()?;

        let changed = conn.execute("DELETE FROM agents WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn create_execution(&self, execution: NewExecution) -> Result<String, StorageError> {
        let state = self.open()?;
        let conn = state.connection()?;

        let id = uuid::Uuid::new_v4().to_string();
        conn.execute(
            r#"
            INSERT INTO executions (id, agent_id, input, output, status, cost, duration, timestamp)
            VALUES (?1, ?2, ?3, '', ?4, 0, 0, ?5)
            "#,
            params![
                id,
                execution.agent_id,
                execution.input,
                ExecutionStatus::Running.as_str(),
                now_timestamp(),
            ],
        )?;

        Ok(id)
    }

    pub fn update_execution(
        &self,
        id: &str,
        completion: &ExecutionCompletion,
    ) -> Result<UpdateOutcome, StorageError> {
        let assignments = completion.assignments();

        let state = self.open()?;
        let conn = state.connection()?;

        let set_clauses: Vec<String> = assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column.column_name()))
            .collect();
        let mut values: Vec<Value> = assignments.into_iter().map(|(_, value)| value).collect();
        values.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE executions SET {} WHERE id = ?",
            set_clauses.join(", ")
        );
        let changed = conn.execute(&sql, params_from_iter(values.iter()))?;

        Ok(outcome(changed > 0))
    }

    pub fn get_execution(&self, id: &str) -> Result<Option<Execution>, StorageError> {
        let state = self.open()?;
        let conn = state.connection()?;

        let execution = conn
            .query_row(
                &format!("SELECT {} FROM executions WHERE id = ?1", EXECUTION_COLUMNS),
                params![id],
                execution_from_row,
            )
            .optional()?;

        Ok(execution)
    }

    /// Newest first, at most `limit` rows, optionally for one agent only
    pub fn get_executions(
        &self,
        agent_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Execution>, StorageError> {
        let state = self.open()?;
        let conn = state.connection()?;

        let executions = match agent_id {
            Some(agent_id) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM executions WHERE agent_id = ?1 \
                     ORDER BY timestamp DESC, rowid DESC LIMIT ?2",
                    EXECUTION_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![agent_id, limit], execution_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM executions ORDER BY timestamp DESC, rowid DESC LIMIT ?1",
                    EXECUTION_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![limit], execution_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(executions)
    }
}

fn outcome(found: bool) -> UpdateOutcome {
    if found {
        UpdateOutcome::Updated
    } else {
        UpdateOutcome::NotFound
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn agent_from_row(row: &Row<'_>) -> rusqlite::Result<Agent> {
    let tools_json: Option<String> = row.get(7)?;
    let tools = match tools_json {
        Some(json) if !json.is_empty() => serde_json::from_str(&json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?,
        _ => Vec::new(),
    };

    let status_str: String = row.get(8)?;
    let max_tokens: i64 = row.get(6)?;

    Ok(Agent {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        model: row.get(3)?,
        system_prompt: row.get(4)?,
        temperature: row.get(5)?,
        max_tokens: u32::try_from(max_tokens).unwrap_or_default(),
        tools,
        status: AgentStatus::parse(&status_str).unwrap_or_default(),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn execution_from_row(row: &Row<'_>) -> rusqlite::Result<Execution> {
    let status_str: String = row.get(4)?;
    let output: Option<String> = row.get(3)?;
    let duration: i64 = row.get(6)?;

    Ok(Execution {
        id: row.get(0)?,
        agent_id: row.get(1)?,
        input: row.get(2)?,
        output: output.unwrap_or_default(),
        status: ExecutionStatus::parse(&status_str).unwrap_or(ExecutionStatus::Running),
        cost: row.get(5)?,
        duration: u64::try_from(duration).unwrap_or_default(),
        timestamp: row.get(7)?,
    })
}
