use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snaplink::app::{create_app, open_storage};
use snaplink::codegen::RandomCodeGenerator;
use snaplink::config::Config;
use snaplink::service::LinkService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    info!("Initializing database...");
    let storage = open_storage(&config)
        .await
        .context("failed to initialize storage")?;
    info!("Database initialized successfully");

    let service = Arc::new(LinkService::with_generator(
        storage,
        Arc::new(RandomCodeGenerator),
        config.codegen_max_attempts,
    ));

    let app = create_app(service, config.redirect_status.status_code());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("🚀 Server listening on http://{}", addr);
    info!("   - API endpoints available at http://{}/links", addr);
    info!(
        "   - Redirects served from http://{}/{{code}} ({})",
        addr,
        config.redirect_status.status_code()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
