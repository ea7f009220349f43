use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use listener_group::config::{load_config, validate_config, AppConfig, ConfigError};
use listener_group::http::listeners_from_config;
use listener_group::lifecycle::{Coordinator, CoordinatorConfig};
use listener_group::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "listener-group")]
#[command(about = "Run a group of HTTP listeners that shut down together", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let config = AppConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            config
        }
    };

    logging::init(&config.observability);
    tracing::info!("listener-group v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        listeners = config.listeners.len(),
        grace_period_ms = config.shutdown.grace_period_ms,
        handle_signals = config.shutdown.handle_signals,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let coordinator = Coordinator::new(CoordinatorConfig::from(&config.shutdown));
    let outcome = coordinator.run(listeners_from_config(&config)).await;

    for report in &outcome.listeners {
        tracing::info!(listener = %report.name, outcome = ?report.outcome, "Listener result");
    }
    tracing::info!(cause = %outcome.cause, "Shutdown complete");
    Ok(())
}
