//! Backend selection from configuration

use folio_core::config::{BackendKind, LayeredConfig};
use folio_core::error::{FolioError, Result};
use folio_core::models::{ApplicationData, ContactMessage};
use std::sync::Arc;

use crate::file::{FileBackend, FileInbox};
use crate::memory::{MemoryBackend, MemoryInbox};
use crate::portal::PortalStore;
use crate::ports::{DocumentBackend, InboxStore};
use crate::postgres::{PostgresConfig, PostgresInbox, PostgresStore};
use crate::remote::{RemoteBackend, RemoteClient, RemoteInbox};

/// The portal store and both inboxes over one backend
#[derive(Clone)]
pub struct Storage {
    pub portal: Arc<PortalStore>,
    pub applications: Arc<dyn InboxStore<ApplicationData>>,
    pub messages: Arc<dyn InboxStore<ContactMessage>>,
}

impl Storage {
    /// Storage that lives only as long as the process
    pub fn memory() -> Self {
        Self::from_parts(
            Arc::new(MemoryBackend::new()),
            Arc::new(MemoryInbox::new()),
            Arc::new(MemoryInbox::new()),
        )
    }

    pub fn from_parts(
        backend: Arc<dyn DocumentBackend>,
        applications: Arc<dyn InboxStore<ApplicationData>>,
        messages: Arc<dyn InboxStore<ContactMessage>>,
    ) -> Self {
        Self {
            portal: Arc::new(PortalStore::new(backend)),
            applications,
            messages,
        }
    }
}

/// Open the backend selected by `config`
pub async fn open_storage(config: &LayeredConfig) -> Result<Storage> {
    config.validate()?;

    let storage = match config.backend.value {
        BackendKind::Memory => Storage::memory(),
        BackendKind::File => {
            let dir = &config.data_dir.value;
            Storage::from_parts(
                Arc::new(FileBackend::new(dir)),
                Arc::new(FileInbox::new(dir)),
                Arc::new(FileInbox::new(dir)),
            )
        }
        BackendKind::Remote => {
            let url = required(&config.remote_url.value, "remote_url")?;
            let client = RemoteClient::new(url, config.remote_auth.value.clone());
            Storage::from_parts(
                Arc::new(RemoteBackend::new(client.clone())),
                Arc::new(RemoteInbox::new(client.clone())),
                Arc::new(RemoteInbox::new(client)),
            )
        }
        BackendKind::Postgres => {
            let url = required(&config.database_url.value, "database_url")?;
            let pg_config = PostgresConfig::new(url)?;
            let store = PostgresStore::open(pg_config).await?;
            Storage::from_parts(
                Arc::new(store.clone()),
                Arc::new(PostgresInbox::new(&store)),
                Arc::new(PostgresInbox::new(&store)),
            )
        }
    };

    tracing::info!(backend = storage.portal.backend_name(), "Storage opened");
    Ok(storage)
}

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    value.as_deref().ok_or_else(|| FolioError::ConfigMissing {
        key: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::config::ConfigValue;
    use folio_core::config::ConfigSource;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_memory_storage() {
        let mut config = LayeredConfig::with_defaults();
        config.backend = ConfigValue::new(BackendKind::Memory, ConfigSource::Cli);

        let storage = open_storage(&config).await.unwrap();
        assert_eq!(storage.portal.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_open_file_storage_in_data_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = LayeredConfig::with_defaults();
        config.data_dir = ConfigValue::new(dir.path().to_path_buf(), ConfigSource::Cli);

        let storage = open_storage(&config).await.unwrap();
        storage.portal.load_data().await.unwrap();

        assert_eq!(storage.portal.backend_name(), "file");
        assert!(dir.path().join("portal.json").exists());
    }

    #[tokio::test]
    async fn test_postgres_without_url_is_config_error() {
        let mut config = LayeredConfig::with_defaults();
        config.backend = ConfigValue::new(BackendKind::Postgres, ConfigSource::Cli);

        let result = open_storage(&config).await;
        assert!(matches!(result, Err(FolioError::ConfigMissing { .. })));
    }
}
