pub mod agents;
pub mod database;
pub mod llm;
