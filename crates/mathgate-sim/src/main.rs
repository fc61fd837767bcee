//! Mathgate headless simulator entry point.

use std::error::Error;

use mathgate_sim::config::SimConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Mathgate simulator");

    // Read configuration from environment.
    let config = SimConfig::from_env()?;
    tracing::info!(level_path = %config.level_path.display(), "configuration loaded");

    let report = mathgate_sim::run(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
