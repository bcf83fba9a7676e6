//! # smarthoused — smarthouse daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (TOML file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Deep-load the house graph; refuse to start on an inconsistent database
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use tracing_subscriber::EnvFilter;

use smarthouse_adapter_http_axum::router;
use smarthouse_adapter_http_axum::state::AppState;
use smarthouse_adapter_storage_sqlite_sqlx::{
    Config as DbConfig, SqliteHouseRepository, SqliteMeasurementRepository,
};
use smarthouse_app::services::house_service::HouseService;
use smarthouse_app::services::telemetry_service::TelemetryService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let house_repo = SqliteHouseRepository::new(pool.clone());
    let measurement_repo = SqliteMeasurementRepository::new(pool);

    // Services — the house graph load is all-or-nothing; an inconsistent
    // database aborts startup here.
    let house_service = HouseService::load(house_repo).await?;
    let telemetry_service = TelemetryService::new(measurement_repo);

    // HTTP
    let state = AppState::new(house_service, telemetry_service);
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!("smarthoused listening on http://{bind_addr}");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
