//! Sensor panel CLI
//!
//! Command-line interface for the sensor reading dashboard.

use std::path::PathBuf;

use clap::Parser;
use sensor_panel::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "sensor-panel")]
#[command(about = "Sensor reading dashboard with charts and xlsx export")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sensor data endpoint (overrides config file)
    #[arg(long)]
    source_url: Option<String>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, source_url={:?}, dashboard_port={:?}, log_level={:?}",
        args.config,
        args.source_url,
        args.dashboard_port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(source_url) = args.source_url {
        config.source.url = source_url;
    }
    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    tracing::info!("Starting sensor panel for {}", config.source.url);

    sensor_panel::run(config).await?;

    Ok(())
}
