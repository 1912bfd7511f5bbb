//! Oilwatch CLI
//!
//! Command-line interface for the buoy oil-detection dashboard.

use std::path::PathBuf;

use clap::Parser;
use oilwatch::config::API_URL_ENV;
use oilwatch::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "oilwatch")]
#[command(about = "Buoy oil-detection polling service and dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file; empty means same-origin)
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

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
        "Parsed command line arguments: config={:?}, api_url={:?}, dashboard_port={:?}, log_level={:?}",
        args.config,
        args.api_url,
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

    if let Some(api_url) = args.api_url {
        config.api.base_url = api_url;
    }

    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    tracing::info!("Starting oilwatch service");
    oilwatch::run(config).await?;

    Ok(())
}
