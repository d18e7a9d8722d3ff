use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use chinese_tutor::config::Config;
use chinese_tutor::services::{AzureOpenAIClient, TutorService};
use chinese_tutor::utils::{bootstrap_subscriber, init_logging};
use chinese_tutor::{AppState, build_router};

#[derive(Debug, Parser)]
#[command(name = "chinese-tutor", version, about = "Chinese conversation tutor backend")]
struct Args {
    /// Path to config.toml (defaults to conf/config.toml or ./config.toml)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    // Config load logs through a temporary subscriber until the configured one is up
    let config = tracing::subscriber::with_default(bootstrap_subscriber(std::io::stderr), || {
        Config::load(args.config.as_deref())
    })?;
    let _log_guard = init_logging(&config.logging)?;

    tracing::info!("Starting Chinese tutor backend");
    tracing::info!(
        "Azure OpenAI deployment: {} (api-version {})",
        config.azure.deployment_name,
        config.azure.api_version
    );

    let client = AzureOpenAIClient::new(&config.azure).context("Failed to build Azure OpenAI client")?;
    let tutor = Arc::new(TutorService::new(Arc::new(client), &config.tutor));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState { config, tutor });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
