use anyhow::Result;
use folio_client::PortalClient;
use folio_core::config::{BackendKind, LayeredConfig};
use folio_core::models::{ApplicationData, ContactMessage};
use folio_core::FolioError;
use folio_store::ports::InboxStore;
use folio_store::{open_storage, Storage};
use std::sync::Arc;

use crate::errors;

/// Open storage for one CLI invocation
pub struct Session {
    pub backend: BackendKind,
    pub client: PortalClient,
    storage: Storage,
}

impl Session {
    pub async fn open(config: &LayeredConfig) -> Result<Self> {
        let backend = config.backend.value;
        let storage = open_storage(config)
            .await
            .map_err(|e| errors::from_folio(&e, backend))?;

        tracing::debug!(backend = %backend, "Opened storage");

        Ok(Self {
            backend,
            client: PortalClient::new(storage.portal.clone()),
            storage,
        })
    }

    /// Load the portal document into the client
    pub async fn load(&mut self) -> Result<()> {
        let backend = self.backend;
        self.client
            .load()
            .await
            .map_err(|e| errors::from_folio(&e, backend))?;
        Ok(())
    }

    /// Turn a store error into a CLI error with suggestions for this backend
    pub fn fail(&self, error: FolioError) -> anyhow::Error {
        errors::from_folio(&error, self.backend).into()
    }

    pub fn applications(&self) -> &Arc<dyn InboxStore<ApplicationData>> {
        &self.storage.applications
    }

    pub fn messages(&self) -> &Arc<dyn InboxStore<ContactMessage>> {
        &self.storage.messages
    }
}
