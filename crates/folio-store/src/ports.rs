use async_trait::async_trait;
use folio_core::error::Result;
use folio_core::models::{InboxRecord, PortalData};
use folio_core::Fields;

/// Port for persisting the portal document
///
/// This is the whole storage capability a backend provides. Record-level
/// CRUD is implemented once, on top of it, by [`crate::PortalStore`].
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Short backend name for logs and errors
    fn name(&self) -> &'static str;

    /// Read the stored document, or `None` if nothing has been stored yet
    async fn get_document(&self) -> Result<Option<PortalData>>;

    /// Replace the stored document
    async fn put_document(&self, data: &PortalData) -> Result<()>;

    /// Check that the backend can serve requests
    async fn health(&self) -> Result<()> {
        Ok(())
    }
}

/// Port for an intake inbox (applications or contact messages)
#[async_trait]
pub trait InboxStore<R: InboxRecord>: Send + Sync {
    /// Store a new record built from submitted fields
    ///
    /// Identity, initial status and arrival time are assigned here.
    async fn submit(&self, fields: Fields) -> Result<R>;

    /// All records, newest first
    async fn list(&self) -> Result<Vec<R>>;

    /// Get a record by ID
    async fn get(&self, id: &str) -> Result<Option<R>>;

    /// Move a record to a new status
    ///
    /// Returns `None` if no record has this id. Backward transitions fail.
    async fn set_status(&self, id: &str, status: R::Status) -> Result<Option<R>>;

    /// Delete a record, reporting whether it existed
    async fn delete(&self, id: &str) -> Result<bool>;
}
