use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use schoolhub::logging::init_tracing;
use schoolhub::router::init_router;
use schoolhub::state::init_app_state;
use schoolhub_config::ServerConfig;
use schoolhub_db::run_migrations;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Flushes the file appender on exit.
    let _guard = init_tracing().context("failed to create the log directory")?;

    let state = init_app_state()
        .await
        .context("failed to connect to the database")?;
    run_migrations(&state.db)
        .await
        .context("failed to run database migrations")?;

    let address = ServerConfig::from_env().address();
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!(%address, "Server running");
    info!("Swagger UI available at http://{address}/swagger-ui");
    info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
