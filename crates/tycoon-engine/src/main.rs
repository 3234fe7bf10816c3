//! Game server binary for Energy Tycoon.
//!
//! This is the main entry point that wires together configuration,
//! startup validation, the save store, and the HTTP server. Once
//! serving, all game activity lives in per-player sessions opened
//! lazily by the API layer.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `tycoon-config.yaml`
//! 3. Validate the seeded universe and skill graph
//! 4. Construct the save store (memory, file, or `PostgreSQL`)
//! 5. Serve the game API until a shutdown signal arrives
//! 6. Stop every session (final saves) and exit

mod error;

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tycoon_core::config::{StoreBackend, TycoonConfig};
use tycoon_core::state;
use tycoon_db::{PostgresPool, SaveStore};
use tycoon_server::{AppState, ServerConfig};

use crate::error::EngineError;

/// Application entry point for the game server.
///
/// Initializes all subsystems and serves the game API until the process
/// receives a shutdown signal.
///
/// # Errors
///
/// Returns an error if any initialization step fails or the server
/// stops with a fatal error.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("tycoon-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        scenario = ?config.game.scenario,
        map_size = config.game.map_size,
        tick_interval_ms = config.game.tick_interval_ms,
        autosave_every_ticks = config.game.autosave_every_ticks,
        "Configuration loaded"
    );

    // 3. Validate seeded data before serving.
    state::validate_scenario(config.game.scenario)?;
    info!(scenario = ?config.game.scenario, "Seeded universe and skill graph validated");

    // 4. Construct the save store.
    let store = build_store(&config).await?;

    // 5. Serve the game API until a shutdown signal arrives.
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let app_state = Arc::new(AppState::new(config, store));

    tokio::select! {
        result = tycoon_server::start_server(&server_config, Arc::clone(&app_state)) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    // 6. Stop every session so final saves land before exit.
    app_state.shutdown().await;
    info!("tycoon-engine shutdown complete");

    Ok(())
}

/// Load the configuration from `tycoon-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
/// Defaults (with environment overrides applied) are used when the file
/// is absent.
fn load_config() -> Result<TycoonConfig, EngineError> {
    let config_path = Path::new("tycoon-config.yaml");
    if config_path.exists() {
        let config = TycoonConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        let mut config = TycoonConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// Construct the configured save store, running migrations when the
/// backend is `PostgreSQL`.
async fn build_store(config: &TycoonConfig) -> Result<SaveStore, EngineError> {
    match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory save store (saves are lost on shutdown)");
            Ok(SaveStore::memory())
        }
        StoreBackend::File => {
            info!(save_dir = %config.store.save_dir, "Using file save store");
            Ok(SaveStore::file(config.store.save_dir.clone()))
        }
        StoreBackend::Postgres => {
            let pool = PostgresPool::connect_url(&config.store.postgres_url).await?;
            pool.run_migrations().await?;
            info!("Using PostgreSQL save store");
            Ok(SaveStore::postgres(pool))
        }
    }
}
