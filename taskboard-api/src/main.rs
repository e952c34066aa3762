//! # Taskboard API Server
//!
//! Personal task tracking: accounts, owner-scoped tasks, a status board and
//! dashboard counts.
//!
//! ## Usage
//!
//! ```bash
//! SESSION_SECRET=... DATABASE_URL=postgres://... cargo run -p taskboard-api
//! ```
//!
//! Without `DATABASE_URL` the server runs on in-memory storage.

use anyhow::Context;
use taskboard_api::{app::{build_router, AppState}, config::Config};
use taskboard_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{close_pool, create_pool, PoolConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskboard_api=debug,taskboard_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Taskboard API Server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Invalid configuration")?;
    let address = config.bind_address();

    let (state, pool) = match config.database.clone() {
        Some(database) => {
            ensure_database_exists(&database.url)
                .await
                .context("Failed to create database")?;

            let pool = create_pool(&PoolConfig::new(database.url).with_max_connections(database.max_connections))
                .await
                .context("Failed to connect to database")?;

            run_migrations(&pool).await.context("Failed to run migrations")?;

            (AppState::postgres(pool.clone(), config), Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory storage, data is lost on restart");
            (AppState::in_memory(config), None)
        }
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}
