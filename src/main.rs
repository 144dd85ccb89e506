use models::{LeadApp, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod channels;
mod classify;
mod cli;
mod config;
mod credits;
mod dispatch;
mod errors;
mod models;
mod normalizer;
mod scoring;
mod selection;
mod server;
mod sources;
mod store;
mod timeslots;

use config::{load_config, Config};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config.yml: {}. Using defaults.", e);
            Config::default()
        }
    };

    // Setup logging
    let default_directive = format!("lead_engine={}", config.logging.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(default_directive.parse().unwrap_or_else(|_| {
                    "lead_engine=info".parse().expect("static directive parses")
                })),
        )
        .init();

    // Create output directory
    tokio::fs::create_dir_all(&config.output.directory).await?;

    info!("Initializing state store...");
    let mut app = LeadApp::new(config).await?;

    // Add graceful shutdown
    tokio::select! {
        result = app.run() => {
            result?;
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
