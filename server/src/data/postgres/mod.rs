//! PostgreSQL database service
//!
//! Owns the connection pool and the embedded schema:
//! - Connection pooling with min/max bounds
//! - Idle connection cleanup and lifetime cycling
//! - Per-connection statement timeout
//!
//! Operator tooling (`system init`, `system reset`) goes through
//! [`PostgresService::init_schema_file`] and [`PostgresService::reset`].

mod bind;
pub mod error;
mod migrations;
pub mod repositories;
pub mod schema;

pub use bind::bind_args;
pub use error::PostgresError;
pub use sqlx::PgPool;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::log::LevelFilter;

use crate::core::config::PostgresConfig;
use crate::core::constants::{
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
    POSTGRES_HEALTH_CHECK_INTERVAL_SECS,
};

fn or_default<T: PartialEq + Default>(value: T, default: T) -> T {
    if value == T::default() { default } else { value }
}

/// PostgreSQL database service
///
/// Created once at startup and shared behind an `Arc`.
pub struct PostgresService {
    pool: PgPool,
}

impl PostgresService {
    /// Connect, then bring the schema up to date
    ///
    /// Zero valued pool settings fall back to the built-in defaults.
    pub async fn init(config: &PostgresConfig) -> Result<Self, PostgresError> {
        let url = config.url.as_str();
        if url.is_empty() {
            return Err(PostgresError::Config("PostgreSQL URL is required".into()));
        }

        let max_connections =
            or_default(config.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS);
        let min_connections =
            or_default(config.min_connections, POSTGRES_DEFAULT_MIN_CONNECTIONS);
        let acquire_timeout =
            or_default(config.acquire_timeout_secs, POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS);
        let idle_timeout =
            or_default(config.idle_timeout_secs, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS);
        let max_lifetime =
            or_default(config.max_lifetime_secs, POSTGRES_DEFAULT_MAX_LIFETIME_SECS);
        let statement_timeout = or_default(
            config.statement_timeout_secs,
            POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
        );

        let options: PgConnectOptions = url
            .parse()
            .map_err(|e| PostgresError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;
        let options = options
            .log_statements(LevelFilter::Trace)
            .options([("statement_timeout", format!("{}s", statement_timeout))]);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!(
            max_connections,
            min_connections,
            acquire_timeout_secs = acquire_timeout,
            idle_timeout_secs = idle_timeout,
            max_lifetime_secs = max_lifetime,
            statement_timeout_secs = statement_timeout,
            "PostgresService initialized"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Execute every statement in an operator supplied schema file
    pub async fn init_schema_file(&self, path: &Path) -> Result<(), PostgresError> {
        let schema = tokio::fs::read_to_string(path).await?;
        sqlx::raw_sql(&schema).execute(&self.pool).await?;
        tracing::debug!(path = %path.display(), "Schema file applied");
        Ok(())
    }

    /// Remove every user and restart the id sequence. Not for production data.
    pub async fn reset(&self) -> Result<(), PostgresError> {
        sqlx::query("TRUNCATE users RESTART IDENTITY CASCADE")
            .execute(&self.pool)
            .await?;
        tracing::debug!("Users table truncated");
        Ok(())
    }

    /// Whether `table` resolves to a relation on the search path
    pub async fn table_exists(&self, table: &str) -> Result<bool, PostgresError> {
        let found: Option<String> = sqlx::query_scalar("SELECT to_regclass($1)::text")
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL pool closed");
    }

    /// Periodic `SELECT 1` until shutdown is triggered
    pub fn start_health_check_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(POSTGRES_HEALTH_CHECK_INTERVAL_SECS));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("PostgreSQL health check task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = sqlx::query("SELECT 1").execute(&db.pool).await {
                            tracing::warn!("PostgreSQL health check failed: {}", e);
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_default() {
        assert_eq!(or_default(0u32, 20), 20);
        assert_eq!(or_default(5u32, 20), 5);
        assert_eq!(or_default(0u64, 60), 60);
    }

    #[tokio::test]
    async fn test_init_requires_url() {
        let config = PostgresConfig::default();
        let err = PostgresService::init(&config).await.err().unwrap();
        assert!(matches!(err, PostgresError::Config(_)));
    }

    #[tokio::test]
    async fn test_init_rejects_invalid_url() {
        let config = PostgresConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        let err = PostgresService::init(&config).await.err().unwrap();
        assert!(matches!(err, PostgresError::Config(_)));
    }
}
