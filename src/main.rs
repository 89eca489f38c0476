//! Magus - Terminal Entry Point
//!
//! A minimal line-based shell around the library: reads questions from
//! stdin, prints answers, and exposes `/clear`, `/export` and `/quit`.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use magus::agent::PromptTemplate;
use magus::config::{Config, ProviderKind};
use magus::llm::{GeminiClient, Generator, OpenAiClient};
use magus::session::SessionRegistry;
use magus::tools::{ToolRegistry, WebSearch, Wikipedia, YouTubeSearch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "magus=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let llm = build_generator(&config);
    info!(provider = llm.name(), "loaded configuration");

    let mut sessions = SessionRegistry::new(
        llm,
        Arc::new(build_tools(&config)?),
        Arc::new(PromptTemplate::default()),
    )
    .with_max_iterations(config.max_iterations);
    let agent = sessions.session("local");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"Ask me anything. /clear resets, /export saves, /quit exits.\n> ")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => {}
            "/quit" | "/exit" => break,
            "/clear" => {
                agent.clear_chat_history();
                stdout.write_all(b"History cleared.\n").await?;
            }
            "/export" => {
                let filename = format!(
                    "{}-chat-history.json",
                    chrono::Utc::now().format("%Y%m%dT%H%M%S")
                );
                std::fs::write(&filename, agent.export_chat_history()?)?;
                stdout
                    .write_all(format!("Saved {}\n", filename).as_bytes())
                    .await?;
            }
            question => {
                let answer = agent.ask(question).await;
                stdout.write_all(format!("{}\n", answer).as_bytes()).await?;
            }
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Bind the configured generation provider.
fn build_generator(config: &Config) -> Arc<dyn Generator> {
    match config.provider {
        ProviderKind::OpenAi => {
            let mut client = OpenAiClient::new(config.api_key.clone());
            if let Some(model) = &config.model {
                client = client.with_model(model);
            }
            Arc::new(client)
        }
        ProviderKind::Gemini => {
            let mut client = GeminiClient::new(config.api_key.clone());
            if let Some(model) = &config.model {
                client = client.with_model(model);
            }
            Arc::new(client)
        }
    }
}

/// Register the lookup tools. Web search needs a Serper key; without one the
/// agent still runs with Wikipedia and YouTube.
fn build_tools(config: &Config) -> anyhow::Result<ToolRegistry> {
    let mut tools = ToolRegistry::new();

    match &config.serper_api_key {
        Some(key) => tools.register(Arc::new(WebSearch::with_settings(
            key.clone(),
            config.search.clone(),
        )))?,
        None => warn!("SERPER_API_KEY not set; web search disabled"),
    }
    tools.register(Arc::new(Wikipedia::new()))?;
    tools.register(Arc::new(YouTubeSearch::new()))?;

    Ok(tools)
}
