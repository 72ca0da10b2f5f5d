//! # Visitor Analytics Server
//!
//! Application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - HTTP/WebSocket server

use anyhow::Result;
use tracing::info;

use visitor_analytics::config::Settings;
use visitor_analytics::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    visitor_analytics::telemetry::init_tracing();

    info!("Starting Visitor Analytics...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
