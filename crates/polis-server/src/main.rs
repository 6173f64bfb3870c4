//! Polis server binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `polis-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the city factory and session coordinator
//! 4. Spawn the HTTP + `WebSocket` server
//! 5. Start the step timer if configured
//! 6. Run until `Ctrl-C` or the server exits

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use polis_core::config::{LogFormat, LoggingConfig, PolisConfig};
use polis_server::scheduler::spawn_step_timer;
use polis_server::{AppState, ServerConfig, spawn_server};
use polis_sim::CityFactory;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Path of the service configuration file, relative to the working
/// directory.
const CONFIG_PATH: &str = "polis-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the server
/// cannot start.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration (logging depends on it).
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(from_file, "polis-server starting");
    info!(
        host = %config.server.host,
        port = config.server.port,
        max_population = config.session.max_population,
        vote_timeout_secs = ?config.session.vote_timeout_secs,
        step_interval_secs = ?config.session.step_interval_secs,
        population_path = %config.population.path.display(),
        "Configuration loaded"
    );

    // 3. Build the coordinator.
    let factory = CityFactory::from_config(&config.population);
    let state = Arc::new(AppState::new(factory, &config.session));

    // 4. Start the server.
    let server = spawn_server(ServerConfig::from(&config.server), Arc::clone(&state))?;

    // 5. Step timer.
    let timer = config
        .session
        .step_interval_secs
        .filter(|secs| *secs > 0)
        .map(|secs| spawn_step_timer(Arc::clone(&state), Duration::from_secs(secs)));

    // 6. Wait for shutdown.
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutdown signal received");
        }
        _ = server => {
            info!("Server task exited");
        }
    }
    if let Some(timer) = timer {
        timer.abort();
    }

    info!("polis-server shutdown complete");
    Ok(())
}

/// Load `polis-config.yaml`, falling back to defaults when absent.
///
/// Returns the config and whether it came from the file.
fn load_config() -> Result<(PolisConfig, bool), polis_core::config::ConfigError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        Ok((PolisConfig::from_file(path)?, true))
    } else {
        let mut config = PolisConfig::default();
        config.apply_env_overrides();
        Ok((config, false))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
