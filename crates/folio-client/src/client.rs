use folio_core::error::Result;
use folio_core::models::{About, PortalData, Section};
use folio_core::Fields;
use folio_store::PortalStore;
use serde_json::Value;
use std::sync::Arc;

use crate::state::LoadState;

/// Data access layer over a portal store with a locally patched mirror
///
/// The mirror only changes after the store confirms a mutation, so a failed
/// call leaves it as it was. Failures are also recorded in [`Self::error`]
/// before being returned.
pub struct PortalClient {
    store: Arc<PortalStore>,
    state: LoadState,
    data: Option<PortalData>,
    error: Option<String>,
}

impl PortalClient {
    pub fn new(store: Arc<PortalStore>) -> Self {
        Self {
            store,
            state: LoadState::Uninitialized,
            data: None,
            error: None,
        }
    }

    /// Current mirror of the document, if one has been loaded
    pub fn data(&self) -> Option<&PortalData> {
        self.data.as_ref()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Message of the last failed operation
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Load the document into the mirror
    pub async fn load(&mut self) -> Result<&PortalData> {
        self.state = LoadState::Loading;
        match self.store.load_data().await {
            Ok(data) => {
                self.state = LoadState::Ready;
                self.error = None;
                Ok(self.data.insert(data))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Portal load failed");
                self.state = LoadState::Error(e.to_string());
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Drop the store's cached document and load it again
    pub async fn refresh_data(&mut self) -> Result<&PortalData> {
        self.store.invalidate().await;
        self.load().await
    }

    pub async fn create_item(&mut self, section: Section, fields: Fields) -> Result<Value> {
        let result = self.store.create(section, fields).await;
        let record = self.track(result)?;
        self.patch_mirror(|data| data.put_record(section, record.clone()))
            .await;
        Ok(record)
    }

    /// Returns `None` and leaves the mirror alone when no record has this id
    pub async fn update_item(
        &mut self,
        section: Section,
        id: &str,
        patch: Fields,
    ) -> Result<Option<Value>> {
        let result = self.store.update(section, id, patch).await;
        let record = self.track(result)?;
        if let Some(record) = &record {
            self.patch_mirror(|data| data.put_record(section, record.clone()))
                .await;
        }
        Ok(record)
    }

    pub async fn delete_item(&mut self, section: Section, id: &str) -> Result<bool> {
        let result = self.store.delete(section, id).await;
        let removed = self.track(result)?;
        if removed {
            self.patch_mirror(|data| data.delete_record(section, id).map(|_| ()))
                .await;
        }
        Ok(removed)
    }

    pub async fn update_about(&mut self, patch: Fields) -> Result<About> {
        let result = self.store.update_about(patch).await;
        let about = self.track(result)?;
        if let Some(data) = self.data.as_mut() {
            data.about = about.clone();
        }
        Ok(about)
    }

    /// Create research records from BibTeX text
    pub async fn import_bibtex(&mut self, text: &str) -> Result<Vec<Value>> {
        let result = self.store.import_bibtex(text).await;
        let records = self.track(result)?;
        for record in &records {
            self.patch_mirror(|data| data.put_record(Section::Research, record.clone()))
                .await;
        }
        Ok(records)
    }

    pub async fn export_data(&mut self) -> Result<String> {
        let result = self.store.export_data().await;
        self.track(result)
    }

    /// Replace the stored document, then reload the mirror
    pub async fn import_data(&mut self, text: &str) -> Result<()> {
        let result = self.store.import_data(text).await;
        self.track(result)?;
        self.refresh_data().await?;
        Ok(())
    }

    /// Restore the default document, then reload the mirror
    pub async fn reset_data(&mut self) -> Result<()> {
        let result = self.store.reset_data().await;
        self.track(result)?;
        self.refresh_data().await?;
        Ok(())
    }

    /// Record the error of a failed store call
    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Portal operation failed");
            self.error = Some(e.to_string());
        }
        result
    }

    async fn patch_mirror(&mut self, patch: impl FnOnce(&mut PortalData) -> Result<()>) {
        let Some(data) = self.data.as_mut() else {
            return;
        };
        if let Err(e) = patch(data) {
            // Store accepted the change, so only the mirror is stale
            tracing::warn!(error = %e, "Mirror patch failed, reloading");
            let _ = self.refresh_data().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use folio_core::defaults::default_portal;
    use folio_core::error::FolioError;
    use folio_store::memory::MemoryBackend;
    use folio_store::DocumentBackend;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    /// Memory backend whose reads and writes can be switched off
    #[derive(Default)]
    struct Switchable {
        inner: MemoryBackend,
        down: AtomicBool,
    }

    impl Switchable {
        fn check(&self) -> Result<()> {
            if self.down.load(Ordering::SeqCst) {
                return Err(FolioError::backend("switchable", "unavailable"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DocumentBackend for Switchable {
        fn name(&self) -> &'static str {
            "switchable"
        }

        async fn get_document(&self) -> Result<Option<PortalData>> {
            self.check()?;
            self.inner.get_document().await
        }

        async fn put_document(&self, data: &PortalData) -> Result<()> {
            self.check()?;
            self.inner.put_document(data).await
        }
    }

    fn client() -> (Arc<Switchable>, PortalClient) {
        let backend = Arc::new(Switchable::default());
        let store = Arc::new(PortalStore::new(backend.clone()));
        (backend, PortalClient::new(store))
    }

    #[tokio::test]
    async fn test_load_moves_to_ready() {
        let (_, mut client) = client();
        assert_eq!(client.state(), &LoadState::Uninitialized);

        client.load().await.unwrap();

        assert!(client.state().is_ready());
        assert_eq!(client.data(), Some(&default_portal()));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_document() {
        let (backend, mut client) = client();
        client.load().await.unwrap();

        backend.down.store(true, Ordering::SeqCst);
        assert!(client.refresh_data().await.is_err());

        assert!(matches!(client.state(), LoadState::Error(_)));
        assert!(client.error().is_some());
        assert_eq!(client.data(), Some(&default_portal()));
    }

    #[tokio::test]
    async fn test_mutations_patch_mirror() {
        let (_, mut client) = client();
        client.load().await.unwrap();

        let created = client
            .create_item(Section::Courses, fields(json!({"title": "Compilers"})))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();
        assert!(client.data().unwrap().courses.iter().any(|c| c.id == id));

        client
            .update_item(Section::Courses, &id, fields(json!({"semester": "Spring"})))
            .await
            .unwrap();
        let course = client.data().unwrap().courses.iter().find(|c| c.id == id).unwrap();
        assert_eq!(course.semester, "Spring");
        assert_eq!(course.title, "Compilers");

        assert!(client.delete_item(Section::Courses, &id).await.unwrap());
        assert!(!client.data().unwrap().courses.iter().any(|c| c.id == id));
    }

    #[tokio::test]
    async fn test_absent_id_is_quiet_noop() {
        let (_, mut client) = client();
        client.load().await.unwrap();
        let before = client.data().cloned();

        let updated = client
            .update_item(Section::Projects, "missing", fields(json!({"title": "x"})))
            .await
            .unwrap();
        let removed = client.delete_item(Section::Projects, "missing").await.unwrap();

        assert!(updated.is_none());
        assert!(!removed);
        assert!(client.error().is_none());
        assert_eq!(client.data().cloned(), before);
    }

    #[tokio::test]
    async fn test_failed_mutation_sets_error_and_keeps_mirror() {
        let (backend, mut client) = client();
        client.load().await.unwrap();
        let before = client.data().cloned();

        backend.down.store(true, Ordering::SeqCst);
        let err = client
            .create_item(Section::Gallery, fields(json!({"title": "t", "image": "i"})))
            .await
            .unwrap_err();

        assert!(matches!(err, FolioError::Backend { .. }));
        assert!(client.error().unwrap().contains("unavailable"));
        assert_eq!(client.data().cloned(), before);

        client.clear_error();
        assert!(client.error().is_none());
    }

    #[tokio::test]
    async fn test_update_about_and_reset() {
        let (_, mut client) = client();
        client.load().await.unwrap();

        let about = client
            .update_about(fields(json!({"name": "Grace"})))
            .await
            .unwrap();
        assert_eq!(client.data().unwrap().about, about);

        client.reset_data().await.unwrap();
        assert_eq!(client.data(), Some(&default_portal()));
    }

    #[tokio::test]
    async fn test_import_reloads_mirror() {
        let (_, mut client) = client();
        client.load().await.unwrap();

        let mut data = default_portal();
        data.about.name = "Imported".to_string();
        client
            .import_data(&serde_json::to_string(&data).unwrap())
            .await
            .unwrap();

        assert_eq!(client.data(), Some(&data));
        assert!(client.import_data("{").await.is_err());
        assert!(client.error().unwrap().contains("Import"));
        assert_eq!(client.data(), Some(&data));
    }

    #[tokio::test]
    async fn test_bibtex_import_patches_research() {
        let (_, mut client) = client();
        client.load().await.unwrap();
        let before = client.data().unwrap().research.len();

        let created = client
            .import_bibtex("@inproceedings{k,\n  title = {Talk},\n  year = {2024},\n}")
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(client.data().unwrap().research.len(), before + 1);
    }
}
