use folio_core::models::{ApplicationData, ContactMessage};
use folio_store::{InboxStore, PortalStore, Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PortalStore>,
    pub applications: Arc<dyn InboxStore<ApplicationData>>,
    pub messages: Arc<dyn InboxStore<ContactMessage>>,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        Self {
            store: storage.portal,
            applications: storage.applications,
            messages: storage.messages,
        }
    }
}
