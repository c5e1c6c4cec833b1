use anyhow::{Context, Result};
use rail_gateway::{config, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so its log level can seed the filter
    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());

    let config = config::AppConfig::load(&config_path)
        .context("Failed to load configuration")?;

    // Initialize tracing
    let default_filter = format!("rail_gateway={},tower_http=debug", config.server.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Darwin rail gateway");
    tracing::info!("Loaded configuration from {}", config_path);

    if config.darwin.token.is_empty() {
        tracing::info!(
            "No fallback Darwin token configured; requests must send '{}'",
            config.server.token_header
        );
    }

    // Start the server
    server::start_server(config).await?;

    Ok(())
}
