//! Record-level CRUD over any document backend
//!
//! Every mutation loads the document, applies the change to a copy, and
//! writes the whole document back. Within one `PortalStore` mutations are
//! serialized; separate processes sharing a backend are not coordinated and
//! the last write wins.

use std::sync::Arc;

use folio_core::bibtex::parse_bibtex;
use folio_core::defaults::default_portal;
use folio_core::error::{FolioError, Result};
use folio_core::models::{About, Entity, PortalData, Section};
use folio_core::Fields;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::ports::DocumentBackend;

pub struct PortalStore {
    backend: Arc<dyn DocumentBackend>,
    /// Last document read from or written to the backend
    cache: RwLock<Option<PortalData>>,
    writer: Mutex<()>,
}

impl PortalStore {
    /// Create a store over the given backend
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            cache: RwLock::new(None),
            writer: Mutex::new(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Liveness of the underlying backend
    pub async fn health(&self) -> Result<()> {
        self.backend.health().await
    }

    /// Return the current document, writing the default one if none exists
    pub async fn load_data(&self) -> Result<PortalData> {
        if let Some(data) = self.cache.read().await.as_ref() {
            return Ok(data.clone());
        }
        let _guard = self.writer.lock().await;
        self.load_locked().await
    }

    /// Drop the cached document so the next load reads the backend
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
        tracing::debug!(backend = self.backend.name(), "Portal cache invalidated");
    }

    /// Records of a list section
    pub async fn list(&self, section: Section) -> Result<Vec<Value>> {
        self.load_data().await?.records(section)
    }

    /// Append a new record with a fresh id and return it
    pub async fn create(&self, section: Section, fields: Fields) -> Result<Value> {
        self.mutate(|data| {
            let mut id = new_id();
            while data.contains_id(section, &id)? {
                id = new_id();
            }
            let record = data.create_record(section, id, fields)?;
            tracing::info!(section = %section, id = %record["id"], "Created record");
            Ok((record, true))
        })
        .await
    }

    /// Shallow-merge `patch` into a record; `None` if the id is absent
    pub async fn update(&self, section: Section, id: &str, patch: Fields) -> Result<Option<Value>> {
        self.mutate(|data| {
            let record = data.update_record(section, id, &patch)?;
            match &record {
                Some(_) => tracing::info!(section = %section, id = %id, "Updated record"),
                None => tracing::debug!(section = %section, id = %id, "Update skipped, no such record"),
            }
            let changed = record.is_some();
            Ok((record, changed))
        })
        .await
    }

    /// Remove a record, reporting whether one was removed
    pub async fn delete(&self, section: Section, id: &str) -> Result<bool> {
        self.mutate(|data| {
            let removed = data.delete_record(section, id)?;
            if removed {
                tracing::info!(section = %section, id = %id, "Deleted record");
            }
            Ok((removed, removed))
        })
        .await
    }

    /// Shallow-merge `patch` into the about record
    pub async fn update_about(&self, patch: Fields) -> Result<About> {
        self.mutate(|data| {
            let about = data.update_about(&patch)?;
            tracing::info!(fields = patch.len(), "Updated about");
            Ok((about, true))
        })
        .await
    }

    /// Serialize the whole document for backup or transfer
    pub async fn export_data(&self) -> Result<String> {
        let data = self.load_data().await?;
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Replace the whole document with a previously exported one
    ///
    /// Nothing is stored unless the text parses as a complete document with
    /// unique ids in every section.
    pub async fn import_data(&self, text: &str) -> Result<PortalData> {
        let data: PortalData =
            serde_json::from_str(text).map_err(|e| FolioError::Import { reason: e.to_string() })?;
        if let Some((section, id)) = data.duplicate_id() {
            return Err(FolioError::Import {
                reason: format!("duplicate id '{}' in {}", id, section),
            });
        }

        self.replace(data, "Imported portal document").await
    }

    /// Replace the whole document with the default one
    pub async fn reset_data(&self) -> Result<PortalData> {
        self.replace(default_portal(), "Reset portal document").await
    }

    /// Create one research record per accepted BibTeX entry
    ///
    /// All records are written in a single document update.
    pub async fn import_bibtex(&self, text: &str) -> Result<Vec<Value>> {
        let entries = parse_bibtex(text)?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        self.mutate(|data| {
            let mut created = Vec::with_capacity(entries.len());
            for entry in entries {
                let mut id = new_id();
                while data.contains_id(Section::Research, &id)? {
                    id = new_id();
                }
                created.push(data.create_record(Section::Research, id, entry.into_fields())?);
            }
            tracing::info!(count = created.len(), "Imported BibTeX entries");
            Ok((created, true))
        })
        .await
    }

    /// Typed [`PortalStore::create`]
    pub async fn create_as<T: Entity>(&self, fields: Fields) -> Result<T> {
        let record = self.create(T::SECTION, fields).await?;
        Ok(serde_json::from_value(record)?)
    }

    /// Typed [`PortalStore::update`]
    pub async fn update_as<T: Entity>(&self, id: &str, patch: Fields) -> Result<Option<T>> {
        match self.update(T::SECTION, id, patch).await? {
            Some(record) => Ok(Some(serde_json::from_value(record)?)),
            None => Ok(None),
        }
    }

    /// Typed records of one section
    pub async fn items<T: Entity>(&self) -> Result<Vec<T>> {
        Ok(T::list(&self.load_data().await?).clone())
    }

    async fn load_locked(&self) -> Result<PortalData> {
        if let Some(data) = self.cache.read().await.as_ref() {
            return Ok(data.clone());
        }

        let data = match self.backend.get_document().await? {
            Some(data) => data,
            None => {
                tracing::info!(
                    backend = self.backend.name(),
                    "No portal document stored, writing default"
                );
                let data = default_portal();
                self.backend.put_document(&data).await?;
                data
            }
        };

        *self.cache.write().await = Some(data.clone());
        Ok(data)
    }

    /// Apply `op` to a copy of the document and persist it if it reports a change
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut PortalData) -> Result<(T, bool)>,
    ) -> Result<T> {
        let _guard = self.writer.lock().await;
        let mut data = self.load_locked().await?;
        let (output, changed) = op(&mut data)?;
        if changed {
            self.backend.put_document(&data).await?;
            *self.cache.write().await = Some(data);
        }
        Ok(output)
    }

    async fn replace(&self, data: PortalData, message: &'static str) -> Result<PortalData> {
        let _guard = self.writer.lock().await;
        self.backend.put_document(&data).await?;
        *self.cache.write().await = Some(data.clone());
        tracing::info!(backend = self.backend.name(), "{}", message);
        Ok(data)
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use async_trait::async_trait;
    use folio_core::models::EducationItem;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    /// Counts writes and can be told to fail them
    #[derive(Default)]
    struct FlakyBackend {
        inner: MemoryBackend,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl DocumentBackend for FlakyBackend {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn get_document(&self) -> Result<Option<PortalData>> {
            self.inner.get_document().await
        }

        async fn put_document(&self, data: &PortalData) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(FolioError::backend("flaky", "write refused"));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.put_document(data).await
        }
    }

    #[tokio::test]
    async fn test_load_initializes_default_once() {
        let backend = Arc::new(FlakyBackend::default());
        let store = PortalStore::new(backend.clone());

        let first = store.load_data().await.unwrap();
        let second = store.load_data().await.unwrap();

        assert_eq!(first, default_portal());
        assert_eq!(first, second);
        assert_eq!(backend.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_absent_id_does_not_persist() {
        let backend = Arc::new(FlakyBackend::default());
        let store = PortalStore::new(backend.clone());
        store.load_data().await.unwrap();

        let result = store
            .update(Section::Courses, "missing", fields(json!({"title": "x"})))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(backend.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_last_good_state() {
        let backend = Arc::new(FlakyBackend::default());
        let store = PortalStore::new(backend.clone());
        let before = store.load_data().await.unwrap();

        backend.fail_writes.store(true, Ordering::SeqCst);
        let err = store
            .create(Section::Gallery, fields(json!({"title": "t", "image": "i"})))
            .await
            .unwrap_err();

        assert!(matches!(err, FolioError::Backend { .. }));
        assert_eq!(store.load_data().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_import_rejects_duplicate_ids() {
        let store = PortalStore::new(Arc::new(MemoryBackend::new()));
        let text = json!({
            "about": {"name": "A"},
            "courses": [
                {"id": "c", "title": "One"},
                {"id": "c", "title": "Two"}
            ]
        })
        .to_string();

        let err = store.import_data(&text).await.unwrap_err();
        assert!(matches!(err, FolioError::Import { .. }));
        assert_eq!(store.load_data().await.unwrap(), default_portal());
    }

    #[tokio::test]
    async fn test_invalidate_rereads_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let store = PortalStore::new(backend.clone());
        store.load_data().await.unwrap();

        let mut changed = default_portal();
        changed.about.name = "Changed elsewhere".to_string();
        backend.put_document(&changed).await.unwrap();

        assert_eq!(store.load_data().await.unwrap().about.name, "Your Name");
        store.invalidate().await;
        assert_eq!(store.load_data().await.unwrap().about.name, "Changed elsewhere");
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let store = PortalStore::new(Arc::new(MemoryBackend::new()));
        let item: EducationItem = store
            .create_as(fields(json!({"degree": "MSc", "institution": "Y"})))
            .await
            .unwrap();

        let updated: EducationItem = store
            .update_as(&item.id, fields(json!({"year": "2019"})))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.degree, "MSc");
        assert_eq!(updated.year, "2019");
        assert!(store.items::<EducationItem>().await.unwrap().contains(&updated));
    }

    #[tokio::test]
    async fn test_import_bibtex_creates_research_records() {
        let store = PortalStore::new(Arc::new(MemoryBackend::new()));
        let before = store.list(Section::Research).await.unwrap().len();

        let created = store
            .import_bibtex("@article{a,\n title = {One},\n}\n@misc{b,\n title = {Two},\n}\n")
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0]["title"], "One");
        assert_eq!(store.list(Section::Research).await.unwrap().len(), before + 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_all_kept() {
        let store = Arc::new(PortalStore::new(Arc::new(MemoryBackend::new())));
        store.load_data().await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create(Section::Categories, fields(json!({"name": format!("c{}", i)})))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let categories = store.list(Section::Categories).await.unwrap();
        assert_eq!(categories.len(), default_portal().categories.len() + 16);
    }
}
