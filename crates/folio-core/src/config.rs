use crate::error::{FolioError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the configuration file
pub const CONFIG_FILE_NAME: &str = "folio.toml";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Which storage backend holds the portal document and inboxes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process memory; lost on exit
    Memory,
    /// JSON files in a local data directory
    #[default]
    File,
    /// A JSON document served over REST
    Remote,
    /// PostgreSQL tables
    Postgres,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Memory => "memory",
            BackendKind::File => "file",
            BackendKind::Remote => "remote",
            BackendKind::Postgres => "postgres",
        };
        f.write_str(name)
    }
}

/// Layered configuration for Folio
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub backend: ConfigValue<BackendKind>,
    pub data_dir: ConfigValue<PathBuf>,
    pub database_url: ConfigValue<Option<String>>,
    pub remote_url: ConfigValue<Option<String>>,
    pub remote_auth: ConfigValue<Option<String>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            backend: ConfigValue::new(BackendKind::File, ConfigSource::Default),
            data_dir: ConfigValue::new(PathBuf::from(".folio"), ConfigSource::Default),
            database_url: ConfigValue::new(None, ConfigSource::Default),
            remote_url: ConfigValue::new(None, ConfigSource::Default),
            remote_auth: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| FolioError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| FolioError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(backend) = file_config.backend {
            self.backend.update(backend, ConfigSource::File);
        }

        if let Some(data_dir) = file_config.data_dir {
            self.data_dir.update(data_dir, ConfigSource::File);
        }

        if let Some(database_url) = file_config.database_url {
            self.database_url.update(Some(database_url), ConfigSource::File);
        }

        if let Some(remote_url) = file_config.remote_url {
            self.remote_url.update(Some(remote_url), ConfigSource::File);
        }

        if let Some(remote_auth) = file_config.remote_auth {
            self.remote_auth.update(Some(remote_auth), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load the file only if it exists
    pub fn load_from_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // FOLIO_BACKEND
        if let Ok(backend_str) = env::var("FOLIO_BACKEND") {
            match parse_backend_kind(&backend_str) {
                Ok(backend) => self.backend.update(backend, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FOLIO_BACKEND value '{}': expected memory, file, remote, or postgres",
                    backend_str
                ),
            }
        }

        // FOLIO_DATA_DIR
        if let Ok(data_dir) = env::var("FOLIO_DATA_DIR") {
            if data_dir.trim().is_empty() {
                tracing::warn!("Ignoring empty FOLIO_DATA_DIR");
            } else {
                self.data_dir.update(PathBuf::from(data_dir), ConfigSource::Environment);
            }
        }

        // DATABASE_URL
        if let Ok(database_url) = env::var("DATABASE_URL") {
            self.database_url.update(Some(database_url), ConfigSource::Environment);
        }

        // FOLIO_REMOTE_URL
        if let Ok(remote_url) = env::var("FOLIO_REMOTE_URL") {
            self.remote_url.update(Some(remote_url), ConfigSource::Environment);
        }

        // FOLIO_REMOTE_AUTH
        if let Ok(remote_auth) = env::var("FOLIO_REMOTE_AUTH") {
            self.remote_auth.update(Some(remote_auth), ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(backend) = overrides.backend {
            self.backend.update(backend, ConfigSource::Cli);
        }

        if let Some(data_dir) = overrides.data_dir {
            self.data_dir.update(data_dir, ConfigSource::Cli);
        }

        if let Some(database_url) = overrides.database_url {
            self.database_url.update(Some(database_url), ConfigSource::Cli);
        }
    }

    /// Check that the selected backend has what it needs
    pub fn validate(&self) -> Result<()> {
        match self.backend.value {
            BackendKind::Postgres if self.database_url.value.is_none() => {
                Err(FolioError::ConfigMissing { key: "database_url".to_string() })
            }
            BackendKind::Remote if self.remote_url.value.is_none() => {
                Err(FolioError::ConfigMissing { key: "remote_url".to_string() })
            }
            _ => Ok(()),
        }
    }

    /// Get all configuration values as a map for inspection
    ///
    /// Secrets are masked.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "backend".to_string(),
            (self.backend.value.to_string(), self.backend.source),
        );

        map.insert(
            "data_dir".to_string(),
            (self.data_dir.value.display().to_string(), self.data_dir.source),
        );

        map.insert(
            "database_url".to_string(),
            (mask(&self.database_url.value), self.database_url.source),
        );

        map.insert(
            "remote_url".to_string(),
            (
                self.remote_url.value.clone().unwrap_or_else(|| "(unset)".to_string()),
                self.remote_url.source,
            ),
        );

        map.insert(
            "remote_auth".to_string(),
            (mask(&self.remote_auth.value), self.remote_auth.source),
        );

        map
    }
}

fn mask(secret: &Option<String>) -> String {
    match secret {
        Some(_) => "********".to_string(),
        None => "(unset)".to_string(),
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    backend: Option<BackendKind>,
    data_dir: Option<PathBuf>,
    database_url: Option<String>,
    remote_url: Option<String>,
    remote_auth: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub backend: Option<BackendKind>,
    pub data_dir: Option<PathBuf>,
    pub database_url: Option<String>,
}

/// Parse backend kind from string
pub fn parse_backend_kind(s: &str) -> Result<BackendKind> {
    match s.trim().to_lowercase().as_str() {
        "memory" | "mem" => Ok(BackendKind::Memory),
        "file" | "local" => Ok(BackendKind::File),
        "remote" | "firebase" => Ok(BackendKind::Remote),
        "postgres" | "postgresql" | "supabase" => Ok(BackendKind::Postgres),
        _ => Err(FolioError::ConfigInvalid {
            key: "backend".to_string(),
            reason: format!("Invalid backend: {}. Use memory, file, remote, or postgres", s),
        }),
    }
}
