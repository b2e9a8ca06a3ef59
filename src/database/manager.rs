use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::tx::UnitOfWork;

/// Errors from pool construction and connectivity checks
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Handle on the shared connection pool. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Build the pool without touching the network; connections are opened on
    /// first use so the server can start (and report itself degraded) while
    /// the database is still coming up.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = Self::connect_options(config)?;
        let pool = Self::pool_options(config).connect_lazy_with(options);
        info!(
            "Created lazy database pool (max {} connections)",
            config.max_open_conns
        );
        Ok(Self { pool })
    }

    /// Build the pool and open the first connection immediately.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = Self::connect_options(config)?;
        let pool = Self::pool_options(config).connect_with(options).await?;
        info!("Connected database pool");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a transaction scoped to one service operation.
    pub async fn begin(&self) -> Result<UnitOfWork, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(UnitOfWork::new(tx))
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, DatabaseError> {
        if let Some(url) = &config.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|_| DatabaseError::InvalidDatabaseUrl);
        }

        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.name);
        if !config.password.is_empty() {
            options = options.password(&config.password);
        }
        Ok(options)
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_open_conns)
            .min_connections(config.max_idle_conns.min(config.max_open_conns))
            .max_lifetime(non_zero_secs(config.conn_max_lifetime_secs))
            .idle_timeout(non_zero_secs(config.conn_max_idle_time_secs))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs.max(1)))
    }
}

/// Zero disables the limit.
fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
