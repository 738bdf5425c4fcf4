use serde::Deserialize;

/// Status change request body
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}
