use agenthub_llm_sdk::model_metadata::is_supported_model;
use agenthub_llm_sdk::models::DEFAULT_MODEL_ID;
use agenthub_llm_sdk::qwen::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use agenthub_llm_sdk::qwen::QwenApiMode;
use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_environment")]
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub qwen: QwenConfig,
    pub cors: Option<CorsConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QwenConfig {
    /// Kept in memory only; a key set through the API is lost on restart
    pub api_key: Option<String>,
    pub default_model: String,
    pub base_url: String,
    pub mode: QwenApiMode,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

impl Default for QwenConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: DEFAULT_MODEL_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: QwenApiMode::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            database: DatabaseConfig {
                path: get_default_db_path(),
            },
            qwen: QwenConfig::default(),
            cors: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from `override_path`, or from the default location
    /// (creating a commented default file there on first run), then apply
    /// environment overrides.
    pub fn load(override_path: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = match override_path {
            Some(path) => path,
            None => {
                let path = get_config_path();
                write_default_config(&path)?;
                path
            }
        };

        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok((config, config_path))
    }

    /// Reject settings that would make every request fail later
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_supported_model(&self.qwen.default_model) {
            return Err(ConfigError::Message(format!(
                "Unsupported default model '{}'",
                self.qwen.default_model
            )));
        }
        Ok(())
    }

    /// Built-in defaults layered under the file at `path`, if it exists
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let builder = Config::builder()
            .set_default("environment", defaults.environment)?
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default(
                "database.path",
                defaults.database.path.to_string_lossy().to_string(),
            )?
            .set_default("qwen.default_model", defaults.qwen.default_model)?
            .set_default("qwen.base_url", defaults.qwen.base_url)?
            .set_default("qwen.mode", "native")?
            .set_default("qwen.timeout_secs", defaults.qwen.timeout_secs as i64)?
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;
        config.database.path = expand_tilde(&config.database.path);

        Ok(config)
    }

    /// Environment variables take precedence over the file
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup("QWEN_API_KEY") {
            self.qwen.api_key = Some(key);
        }
        if let Some(model) = lookup("DEFAULT_MODEL") {
            self.qwen.default_model = model;
        }
        if let Some(environment) = lookup("AGENTHUB_ENV") {
            self.environment = environment;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database.path = expand_tilde(Path::new(&path));
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ConfigError::Message(format!("Invalid PORT '{}': {}", port, e)))?;
        }
        if let Some(url) = lookup("QWEN_BASE_URL") {
            self.qwen.base_url = url;
        }
        if let Some(mode) = lookup("QWEN_API_MODE") {
            self.qwen.mode = mode.parse().map_err(ConfigError::Message)?;
        }

        Ok(())
    }

    /// The configured provider key, if any
    pub fn qwen_api_key(&self) -> Option<&str> {
        self.qwen
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

fn write_default_config(config_path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::Message(format!("Failed to create config directory: {e}"))
        })?;
    }

    if config_path.exists() {
        return Ok(());
    }

    let default_config = format!(
        r#"environment = "{}"

[server]
host = "{}"
port = {}

[database]
path = "{}"

[qwen]
# api_key = "sk-your-dashscope-key"
default_model = "{}"
base_url = "{}"
mode = "native"  # Options: native, compatible
timeout_secs = {}

# [cors]
# allowed_origins = ["http://localhost:3000"]
"#,
        DEFAULT_ENVIRONMENT,
        DEFAULT_HOST,
        DEFAULT_PORT,
        get_default_db_path().display(),
        DEFAULT_MODEL_ID,
        DEFAULT_BASE_URL,
        DEFAULT_TIMEOUT_SECS,
    );

    std::fs::write(config_path, default_config)
        .map_err(|e| ConfigError::Message(format!("Failed to write default config: {e}")))
}

fn expand_tilde(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = home::home_dir() {
            let path_str = path.to_string_lossy();
            let expanded = path_str.replacen('~', &home.to_string_lossy(), 1);
            return PathBuf::from(expanded);
        }
    }
    path.to_path_buf()
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("agenthub/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

fn get_default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("agenthub/agenthub.db")
    } else {
        PathBuf::from("agenthub.db")
    }
}
