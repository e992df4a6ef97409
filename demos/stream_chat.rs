//! Stream a reply token by token.
//!
//! ```bash
//! QWEN_API_KEY=sk-... cargo run --example stream_chat -- qwen "write a haiku"
//! ```

use std::io::Write;

use tracing_subscriber::EnvFilter;
use unichat::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("unichat=warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let vendor = args.next().unwrap_or_else(|| "qwen".to_string());
    let prompt = args
        .next()
        .unwrap_or_else(|| "Write a haiku about the sea.".to_string());

    let settings = Settings::from_dotenv(".env").unwrap_or_else(|_| Settings::from_env());
    let registry = ProviderRegistry::new(settings);
    let mut stream = registry
        .chat_stream(&vendor, &ChatRequest::new(prompt))
        .await?;

    let mut stdout = std::io::stdout();
    while let Some(chunk) = stream.next().await {
        if !chunk.success {
            eprintln!("\nstream failed: {}", chunk.error.unwrap_or_default());
            break;
        }
        write!(stdout, "{}", chunk.text())?;
        stdout.flush()?;
        if let Some(usage) = chunk.usage {
            eprintln!(
                "\n[{} prompt + {} completion tokens]",
                usage.prompt_tokens, usage.completion_tokens
            );
        }
    }
    println!();
    Ok(())
}
