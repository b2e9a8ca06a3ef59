use anyhow::Context;
use tracing::info;

use collapp_api::config::AppConfig;
use collapp_api::database::Database;
use collapp_api::state::AppState;
use collapp_api::{routes, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_KEY, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env();
    telemetry::init(&config);
    config.validate().context("invalid configuration")?;
    info!("Starting Collapp API in {:?} mode", config.environment);

    let db = Database::connect_lazy(&config.database).context("failed to create database pool")?;

    let bind_addr = config.server.bind_address();
    let state = AppState::new(config, db.clone());
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Collapp API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
