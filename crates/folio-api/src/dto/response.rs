use serde::Serialize;
use serde_json::Value;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn ok(backend: &'static str) -> Self {
        Self {
            status: "ok",
            service: "folio-api",
            backend,
            error: None,
        }
    }

    pub fn unavailable(backend: &'static str, error: impl Into<String>) -> Self {
        Self {
            status: "unavailable",
            service: "folio-api",
            backend,
            error: Some(error.into()),
        }
    }
}

/// Delete operation response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn success(entity: &str, id: &str) -> Self {
        Self {
            success: true,
            message: format!("Successfully deleted {} {}", entity, id),
        }
    }
}

/// BibTeX import response
#[derive(Debug, Serialize)]
pub struct BibtexImportResponse {
    pub imported: usize,
    pub records: Vec<Value>,
}

impl From<Vec<Value>> for BibtexImportResponse {
    fn from(records: Vec<Value>) -> Self {
        Self {
            imported: records.len(),
            records,
        }
    }
}
