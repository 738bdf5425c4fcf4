//! In-memory storage implementations for development and testing.
//!
//! Nothing here survives the process. Use the file, remote or PostgreSQL
//! backend for anything that must persist.

use async_trait::async_trait;
use folio_core::error::Result;
use folio_core::models::{InboxRecord, PortalData};
use folio_core::Fields;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::inbox;
use crate::ports::{DocumentBackend, InboxStore};

/// In-memory implementation of DocumentBackend
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    document: Arc<RwLock<Option<PortalData>>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend already holding a document
    pub fn with_document(data: PortalData) -> Self {
        Self {
            document: Arc::new(RwLock::new(Some(data))),
        }
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_document(&self) -> Result<Option<PortalData>> {
        Ok(self.document.read().await.clone())
    }

    async fn put_document(&self, data: &PortalData) -> Result<()> {
        *self.document.write().await = Some(data.clone());
        Ok(())
    }
}

/// In-memory implementation of InboxStore
#[derive(Debug, Clone)]
pub struct MemoryInbox<R> {
    records: Arc<RwLock<Vec<R>>>,
}

impl<R> Default for MemoryInbox<R> {
    fn default() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<R> MemoryInbox<R> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<R: InboxRecord> InboxStore<R> for MemoryInbox<R> {
    async fn submit(&self, fields: Fields) -> Result<R> {
        let record: R = inbox::new_record(fields)?;
        self.records.write().await.push(record.clone());
        tracing::info!(kind = R::KIND, id = record.id(), "Received submission");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<R>> {
        let mut records = self.records.read().await.clone();
        inbox::newest_first(&mut records);
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id() == id).cloned())
    }

    async fn set_status(&self, id: &str, status: R::Status) -> Result<Option<R>> {
        let mut records = self.records.write().await;
        inbox::apply_status(&mut records, id, status)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        Ok(inbox::remove(&mut records, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::defaults::default_portal;
    use folio_core::error::FolioError;
    use folio_core::models::{ApplicationData, ApplicationStatus, ContactMessage, MessageStatus};
    use serde_json::{json, Value};

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    fn application(name: &str) -> Fields {
        fields(json!({"openingId": "opening-1", "name": name, "email": "a@b.c"}))
    }

    #[tokio::test]
    async fn test_backend_starts_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.get_document().await.unwrap().is_none());

        backend.put_document(&default_portal()).await.unwrap();
        assert_eq!(backend.get_document().await.unwrap(), Some(default_portal()));
    }

    #[tokio::test]
    async fn test_submit_assigns_identity_and_status() {
        let inbox = MemoryInbox::<ApplicationData>::new();
        let record = inbox.submit(application("Ada")).await.unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.status, ApplicationStatus::Pending);
        assert_eq!(inbox.get(&record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_fields() {
        let inbox = MemoryInbox::<ContactMessage>::new();
        let err = inbox.submit(fields(json!({"subject": "hi"}))).await.unwrap_err();

        assert!(matches!(err, FolioError::InvalidSubmission { .. }));
        assert!(inbox.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let inbox = MemoryInbox::<ApplicationData>::new();
        let first = inbox.submit(application("First")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = inbox.submit(application("Second")).await.unwrap();

        let listed = inbox.list().await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn test_status_moves_forward_only() {
        let inbox = MemoryInbox::<ApplicationData>::new();
        let record = inbox.submit(application("Ada")).await.unwrap();

        let reviewed = inbox
            .set_status(&record.id, ApplicationStatus::Reviewed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reviewed.status, ApplicationStatus::Reviewed);

        let err = inbox
            .set_status(&record.id, ApplicationStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidTransition { .. }));

        assert!(inbox
            .set_status("missing", ApplicationStatus::Accepted)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_message_read_and_delete() {
        let inbox = MemoryInbox::<ContactMessage>::new();
        let message = inbox
            .submit(fields(json!({"name": "N", "email": "e@x.y", "message": "Hello"})))
            .await
            .unwrap();
        assert_eq!(message.status, MessageStatus::Unread);

        let read = inbox.set_status(&message.id, MessageStatus::Read).await.unwrap().unwrap();
        assert_eq!(read.status, MessageStatus::Read);

        assert!(inbox.delete(&message.id).await.unwrap());
        assert!(!inbox.delete(&message.id).await.unwrap());
    }
}
