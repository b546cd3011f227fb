use agenthub_llm_sdk::qwen::{QwenClient, PLUS_ID};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var("QWEN_API_KEY")
        .expect("QWEN_API_KEY environment variable must be set");

    let client = QwenClient::new(api_key)?;

    let response = client
        .message_builder()
        .model(PLUS_ID)
        .max_tokens(1024)
        .system_message("You are a concise assistant.")
        .user_message("Explain quantum computing in simple terms.")
        .send()
        .await?;

    println!("Qwen: {}", response.output_text());
    println!("Usage: {} total tokens", response.total_tokens());

    Ok(())
}
