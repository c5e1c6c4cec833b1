use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::darwin::{DarwinClient, RailService};
use crate::server::routes::{create_router, AppState};

/// Builds the gateway application with its middleware stack.
pub fn build_app(config: &AppConfig) -> Result<axum::Router> {
    let client = DarwinClient::new(&config.darwin).context("Failed to create Darwin client")?;
    let state = AppState::new(RailService::new(client), config);

    Ok(create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    ))
}

pub async fn start_server(config: AppConfig) -> Result<()> {
    let addr: SocketAddr = config
        .server
        .listen_address
        .parse()
        .context("Failed to parse listen address")?;

    let app = build_app(&config)?;

    tracing::info!("Starting rail gateway on {}", addr);
    tracing::info!("Forwarding to Darwin at {}", config.darwin.endpoint);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
