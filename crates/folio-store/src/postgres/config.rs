//! Connection settings for the PostgreSQL backend

use folio_core::error::{FolioError, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub pool: PoolConfig,
    /// Apply pending schema migrations when the store opens
    pub run_migrations: bool,
}

impl PostgresConfig {
    pub fn new(database_url: impl Into<String>) -> Result<Self> {
        let config = Self {
            database_url: database_url.into(),
            pool: PoolConfig::default(),
            run_migrations: true,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(invalid("database_url", "cannot be empty"));
        }
        self.pool.validate()
    }
}

/// Connection pool sizing and timeouts
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(invalid("pool.max_connections", "must be greater than 0"));
        }
        if self.min_connections > self.max_connections {
            return Err(invalid(
                "pool.min_connections",
                format!(
                    "{} exceeds max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> FolioError {
    FolioError::ConfigInvalid {
        key: key.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_runs_migrations_with_default_pool() {
        let config = PostgresConfig::new("postgresql://localhost/folio").unwrap();
        assert!(config.run_migrations);
        assert_eq!(config.pool.max_connections, 5);
    }

    #[test]
    fn test_blank_url_is_rejected() {
        match PostgresConfig::new("  ") {
            Err(FolioError::ConfigInvalid { key, .. }) => assert_eq!(key, "database_url"),
            other => panic!("Expected ConfigInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_pool_bounds() {
        let inverted = PoolConfig {
            min_connections: 20,
            max_connections: 10,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let empty = PoolConfig {
            min_connections: 0,
            max_connections: 0,
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }
}
