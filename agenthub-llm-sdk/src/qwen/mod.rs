pub mod builder;
pub mod client;
pub mod types;

pub use builder::QwenMessageBuilder;
pub use client::QwenClient;
pub use types::*;

// Re-export Qwen model constants
pub use crate::models::qwen::*;
