//! Provider name constants

/// Alibaba Cloud DashScope (Qwen models)
pub const DASHSCOPE: &str = "dashscope";
