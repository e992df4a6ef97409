//! Ask every configured vendor the same question.
//!
//! Credentials come from the environment or a `.env` file, e.g.
//! `QWEN_API_KEY`, `OPENAI_API_KEY`, `BAIDU_API_KEY` + `BAIDU_SECRET_KEY`.
//!
//! ```bash
//! RUST_LOG=unichat=debug cargo run --example quick_start
//! ```

use tracing_subscriber::EnvFilter;
use unichat::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("unichat=info")),
        )
        .init();

    let settings = Settings::from_dotenv(".env").unwrap_or_else(|_| Settings::from_env());
    let vendors = settings.configured_vendors();
    if vendors.is_empty() {
        eprintln!("no vendor credentials found; set e.g. QWEN_API_KEY");
        return Ok(());
    }

    let registry = ProviderRegistry::new(settings);
    let request = ChatRequest::new("用一句话介绍一下你自己")
        .with_system_prompt("You are a concise assistant.")
        .with_max_tokens(200);

    for vendor in vendors {
        let response = match registry.chat(vendor.as_str(), &request).await {
            Ok(response) => response,
            Err(error) => {
                println!("[{vendor}] not available: {error}");
                continue;
            }
        };
        match response.into_result() {
            Ok(text) => println!("[{vendor}] {text}"),
            Err(error) => println!("[{vendor}] failed: {error}"),
        }
    }
    Ok(())
}
