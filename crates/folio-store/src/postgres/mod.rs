//! PostgreSQL storage adapter implementation
//!
//! Each portal section is one row of `portal_sections`; inbox records are
//! rows of `inbox_records` keyed by kind and id.

pub mod config;
pub mod document;
pub mod inbox;
pub mod migrations;

pub use config::{PoolConfig, PostgresConfig};
pub use inbox::PostgresInbox;
pub use migrations::{MigrationError, MigrationManager};

use folio_core::error::{FolioError, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

pub(crate) const BACKEND: &str = "postgres";

pub(crate) fn db_error(context: &str, err: impl std::fmt::Display) -> FolioError {
    FolioError::backend(BACKEND, format!("{}: {}", context, err))
}

/// PostgreSQL storage adapter
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given configuration
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .connect(&config.database_url)
            .await
            .map_err(|e| db_error("Failed to connect to database", e))?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| db_error("Connection test failed", e))?;

        tracing::info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Connect and run pending migrations if configured to
    pub async fn open(config: PostgresConfig) -> Result<Self> {
        let run_migrations = config.run_migrations;
        let store = Self::new(config).await?;
        if run_migrations {
            store.run_migrations().await?;
        }
        Ok(store)
    }

    /// Run all pending migrations
    pub async fn run_migrations(&self) -> Result<()> {
        MigrationManager::new(self.pool.clone())
            .run_migrations()
            .await
            .map_err(|e| db_error("Migration failed", e))
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Perform a health check on the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Health check failed", e))?;
        Ok(())
    }
}
