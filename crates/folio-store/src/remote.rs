//! Hosted realtime-database storage over its REST interface
//!
//! Every node of the database tree is addressed as `{base}/{path}.json`.
//! Reads of an absent node return JSON `null`. The portal document lives at
//! `portal`; inbox records live under `applications/{id}` and
//! `messages/{id}`.

use async_trait::async_trait;
use folio_core::error::{FolioError, Result};
use folio_core::models::{InboxRecord, PortalData};
use folio_core::Fields;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::marker::PhantomData;

use crate::inbox;
use crate::ports::{DocumentBackend, InboxStore};

const BACKEND: &str = "remote";
const PORTAL_PATH: &str = "portal";

/// Thin JSON client for the database REST interface
#[derive(Debug, Clone)]
pub struct RemoteClient {
    /// Database root URL (e.g., "https://my-site.firebaseio.com")
    base_url: String,

    /// Optional auth token sent as the `auth` query parameter
    auth: Option<String>,

    client: reqwest::Client,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>, auth: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            client: reqwest::Client::new(),
        }
    }

    /// URL of the node at `path`
    pub fn node_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    /// Request against the node at `path`, carrying the auth token if set
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.node_url(path));
        match &self.auth {
            Some(auth) => builder.query(&[("auth", auth)]),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        let response = check_status(response, path).await?;

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FolioError::backend(BACKEND, format!("Failed to parse response: {}", e)))?;
        if value.is_null() {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| FolioError::backend(BACKEND, format!("Unexpected data at '{}': {}", path, e)))
    }

    async fn put<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<()> {
        let response = self
            .request(reqwest::Method::PUT, path)
            .json(value)
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        check_status(response, path).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, path)
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        check_status(response, path).await?;
        Ok(())
    }

    fn connect_error(&self, err: reqwest::Error) -> FolioError {
        FolioError::backend(
            BACKEND,
            format!("Failed to reach {}: {}", self.base_url, err),
        )
    }
}

async fn check_status(response: reqwest::Response, path: &str) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    Err(FolioError::backend(
        BACKEND,
        format!("Request for '{}' failed ({}): {}", path, status, error_text),
    ))
}

/// DocumentBackend storing the portal document as one database node
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: RemoteClient,
}

impl RemoteBackend {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentBackend for RemoteBackend {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn get_document(&self) -> Result<Option<PortalData>> {
        self.client.get(PORTAL_PATH).await
    }

    async fn put_document(&self, data: &PortalData) -> Result<()> {
        self.client.put(PORTAL_PATH, data).await
    }
}

/// InboxStore keeping one database node per record
pub struct RemoteInbox<R> {
    client: RemoteClient,
    _record: PhantomData<fn() -> R>,
}

impl<R: InboxRecord> RemoteInbox<R> {
    pub fn new(client: RemoteClient) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    fn collection() -> String {
        format!("{}s", R::KIND)
    }

    fn record_path(id: &str) -> String {
        format!("{}/{}", Self::collection(), id)
    }
}

#[async_trait]
impl<R: InboxRecord> InboxStore<R> for RemoteInbox<R> {
    async fn submit(&self, fields: Fields) -> Result<R> {
        let record: R = inbox::new_record(fields)?;
        self.client.put(&Self::record_path(record.id()), &record).await?;
        tracing::info!(kind = R::KIND, id = record.id(), "Received submission");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<R>> {
        let nodes: Option<HashMap<String, R>> = self.client.get(&Self::collection()).await?;
        let mut records: Vec<R> = nodes.unwrap_or_default().into_values().collect();
        inbox::newest_first(&mut records);
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        self.client.get(&Self::record_path(id)).await
    }

    async fn set_status(&self, id: &str, status: R::Status) -> Result<Option<R>> {
        let Some(record) = self.get(id).await? else {
            return Ok(None);
        };
        let mut records = vec![record];
        let updated = inbox::apply_status(&mut records, id, status)?;
        if let Some(record) = &updated {
            self.client.put(&Self::record_path(id), record).await?;
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        if self.get(id).await?.is_none() {
            return Ok(false);
        }
        self.client.delete(&Self::record_path(id)).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::models::{ApplicationData, ContactMessage};

    #[test]
    fn test_node_url_without_auth() {
        let client = RemoteClient::new("https://site.firebaseio.com/", None);
        assert_eq!(client.node_url("portal"), "https://site.firebaseio.com/portal.json");
    }

    #[test]
    fn test_auth_token_is_query_encoded() {
        let client =
            RemoteClient::new("https://site.firebaseio.com", Some("a b&c=d".to_string()));
        let request = client
            .request(reqwest::Method::GET, "/messages/m1/")
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/messages/m1.json");
        assert_eq!(request.url().query(), Some("auth=a+b%26c%3Dd"));
        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("auth".to_string(), "a b&c=d".to_string())]);
    }

    #[test]
    fn test_no_auth_no_query() {
        let client = RemoteClient::new("https://site.firebaseio.com", None);
        let request = client.request(reqwest::Method::PUT, "portal").build().unwrap();
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_inbox_paths() {
        assert_eq!(RemoteInbox::<ApplicationData>::record_path("a1"), "applications/a1");
        assert_eq!(RemoteInbox::<ContactMessage>::collection(), "messages");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_backend_error() {
        let backend = RemoteBackend::new(RemoteClient::new("http://127.0.0.1:9", None));
        let err = backend.get_document().await.unwrap_err();
        assert!(matches!(err, FolioError::Backend { .. }));
    }
}
