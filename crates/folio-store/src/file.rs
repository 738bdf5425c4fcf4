//! JSON file storage under a data directory
//!
//! Layout:
//! ```text
//! <data_dir>/portal.json        the portal document
//! <data_dir>/applications.json  application inbox
//! <data_dir>/messages.json      contact message inbox
//! ```
//!
//! Files are written to a sibling temp file and renamed into place, so a
//! reader never observes a half-written document.

use async_trait::async_trait;
use folio_core::error::{FolioError, Result};
use folio_core::models::{InboxRecord, PortalData};
use folio_core::Fields;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::inbox;
use crate::ports::{DocumentBackend, InboxStore};

pub const PORTAL_FILE_NAME: &str = "portal.json";

/// DocumentBackend storing the portal document as one JSON file
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(PORTAL_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn get_document(&self) -> Result<Option<PortalData>> {
        read_json(&self.path).await
    }

    async fn put_document(&self, data: &PortalData) -> Result<()> {
        write_json(&self.path, data).await
    }
}

/// InboxStore keeping one JSON array file per inbox kind
pub struct FileInbox<R> {
    path: PathBuf,
    lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: InboxRecord> FileInbox<R> {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}s.json", R::KIND)),
            lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<R>> {
        Ok(read_json(&self.path).await?.unwrap_or_default())
    }
}

#[async_trait]
impl<R: InboxRecord> InboxStore<R> for FileInbox<R> {
    async fn submit(&self, fields: Fields) -> Result<R> {
        let record: R = inbox::new_record(fields)?;
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        records.push(record.clone());
        write_json(&self.path, &records).await?;
        tracing::info!(kind = R::KIND, id = record.id(), "Received submission");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<R>> {
        let mut records = self.load().await?;
        inbox::newest_first(&mut records);
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        Ok(self.load().await?.into_iter().find(|record| record.id() == id))
    }

    async fn set_status(&self, id: &str, status: R::Status) -> Result<Option<R>> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let updated = inbox::apply_status(&mut records, id, status)?;
        if updated.is_some() {
            write_json(&self.path, &records).await?;
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let removed = inbox::remove(&mut records, id);
        if removed {
            write_json(&self.path, &records).await?;
        }
        Ok(removed)
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_slice(&bytes).map(Some).map_err(|e| {
        FolioError::backend("file", format!("{} is not valid: {}", path.display(), e))
    })
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote file");
    Ok(())
}
