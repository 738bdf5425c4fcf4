mod request;
mod response;

pub use request::StatusRequest;
pub use response::{BibtexImportResponse, DeleteResponse, HealthResponse};
