//! # Corkboard API Server
//!
//! This is the API server for Corkboard, a collaborative kanban board:
//! boards, columns, cards and their nested entities, tokenized invitations,
//! and the card reorder batch endpoint.
//!
//! ## Architecture
//!
//! The server is built with Axum and provides:
//! - JWT authentication (access/refresh pairs)
//! - Resource-scoped CRUD endpoints with membership checks
//! - A transactional reorder batch endpoint
//! - Multipart attachment uploads
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p corkboard-api
//! ```

use corkboard_api::{
    app::{build_router, AppState},
    bootstrap::ensure_admin_account,
    config::Config,
};
use corkboard_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corkboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Corkboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    ensure_admin_account(&pool, config.admin_bootstrap.as_ref()).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing pool");
    close_pool(pool).await;

    Ok(())
}

/// Resolves when the process receives Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
