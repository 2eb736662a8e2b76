//! # smarthomed: smarthome daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on every adapter.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use smarthome_adapter_http_axum::router;
use smarthome_adapter_http_axum::state::AppState;
use smarthome_adapter_storage_sqlite_sqlx::{
    Config as DbConfig, SqliteApplianceRepository, SqliteHomeRepository, SqliteOpeningRepository,
    SqliteUserRepository, SqliteZoneRepository,
};
use smarthome_app::event_bus::InProcessEventBus;

type SqliteBackend = (
    SqliteHomeRepository,
    SqliteZoneRepository,
    SqliteOpeningRepository,
    SqliteApplianceRepository,
    SqliteUserRepository,
);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

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

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(config.events.capacity));

    // Repositories and services
    let state = AppState::<SqliteBackend>::new(
        SqliteHomeRepository::new(pool.clone()),
        SqliteZoneRepository::new(pool.clone()),
        SqliteOpeningRepository::new(pool.clone()),
        SqliteApplianceRepository::new(pool.clone()),
        SqliteUserRepository::new(pool),
        event_bus,
    );

    // HTTP
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "smarthomed listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("smarthomed stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
