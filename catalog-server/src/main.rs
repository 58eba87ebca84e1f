//! catalog-server binary
//!
//! Loads configuration, opens the store and serves the HTTP API until
//! Ctrl+C.

use catalog_server::api;
use catalog_server::utils::logger::{DEFAULT_FILTER, init_logger_with_file};
use catalog_server::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    init_logger_with_file(DEFAULT_FILTER, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(
        env = %config.environment,
        database = %config.database_url,
        "Starting catalog-server"
    );

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let state = AppState::initialize(config).await?;
    let app = api::build_app(&state).with_state(state);

    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("catalog-server HTTP listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("catalog-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
