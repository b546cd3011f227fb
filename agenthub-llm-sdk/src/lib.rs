//! # Agenthub LLM SDK
//!
//! Model gateway for agenthub: a Qwen (DashScope) chat client behind the
//! provider-agnostic [`client::LlmClient`] trait, plus the static model
//! catalog and price table.
//!
//! ## Example
//!
//! ```rust,no_run
//! use agenthub_llm_sdk::qwen::QwenClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = QwenClient::new("sk-your-dashscope-key")?;
//!     let response = client
//!         .message_builder()
//!         .model("qwen-plus")
//!         .max_tokens(1024)
//!         .system_message("You are a helpful assistant.")
//!         .user_message("Hello, Qwen!")
//!         .send()
//!         .await?;
//!
//!     println!("Response: {}", response.output_text());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod model_metadata;
pub mod models;
pub mod providers;
pub mod qwen;
pub mod types;
