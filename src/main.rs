use anyhow::Context;
use tracing_subscriber::EnvFilter;

use todo_api::config::{self, StorageBackend};
use todo_api::database::DatabaseManager;
use todo_api::{app, auth, is_development, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let config = config::config();
    tracing::info!("Starting Todo API in {:?} mode", config.environment);

    let (state, manager) = match config.storage.backend {
        StorageBackend::Postgres => {
            let manager = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            (AppState::postgres(manager.pool()), Some(manager))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on exit");
            (AppState::in_memory(), None)
        }
    };

    if is_development!() && manager.is_none() {
        // nothing else can create people in a memory store, so seed one
        let person = state.people.create("Dev", "User").await?;
        let token = auth::issue_token(&person.versioning.entity_id)?;
        tracing::info!("Seeded person {}; bearer token: {}", person.versioning.entity_id, token);
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Todo API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(manager) = manager {
        manager.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
