//! Model constants for the Qwen family served by DashScope

/// Qwen model constants
pub mod qwen {
    /// Qwen Turbo - fast, low-cost model for simple tasks
    pub const TURBO_ID: &str = "qwen-turbo";
    pub const TURBO_NAME: &str = "Qwen Turbo";

    /// Qwen Plus - balanced model, the recommended default
    pub const PLUS_ID: &str = "qwen-plus";
    pub const PLUS_NAME: &str = "Qwen Plus";

    /// Qwen Max - strongest reasoning model
    pub const MAX_ID: &str = "qwen-max";
    pub const MAX_NAME: &str = "Qwen Max";
}

/// Model used when an agent does not name one and none is configured
pub const DEFAULT_MODEL_ID: &str = qwen::PLUS_ID;

pub use qwen::*;
