/// PostgreSQL connection pool
///
/// One pool is opened at startup and shared by both repositories. Opening it
/// runs a round trip, so an unreachable database fails startup instead of the
/// first request.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

/// Pool settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,

    /// Wait for a free connection before giving up
    pub acquire_timeout: Duration,

    /// Close connections idle this long; None keeps them
    pub idle_timeout: Option<Duration>,

    /// Recycle connections this old; None keeps them
    pub max_lifetime: Option<Duration>,
}

impl PoolConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = self.min_connections.min(max_connections);
        self
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }
}

/// Opens the pool and checks it answers
pub async fn create_pool(config: &PoolConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        acquire_timeout_ms = config.acquire_timeout.as_millis() as u64,
        "Opening database pool"
    );

    let pool = config.options().connect(&config.url).await?;
    health_check(&pool).await?;

    Ok(pool)
}

/// One `SELECT 1` round trip
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Pinging database");
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn close_pool(pool: PgPool) {
    info!("Closing database pool");
    pool.close().await;
}
