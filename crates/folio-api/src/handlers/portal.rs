use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use folio_core::models::PortalData;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_portal(State(state): State<Arc<AppState>>) -> Result<Json<PortalData>, ApiError> {
    Ok(Json(state.store.load_data().await?))
}

/// POST /api/v1/portal/refresh - Re-read the document from the backend
pub async fn refresh_portal(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PortalData>, ApiError> {
    state.store.invalidate().await;
    Ok(Json(state.store.load_data().await?))
}

/// GET /api/v1/portal/export - Download the document as JSON
pub async fn export_portal(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = state.store.export_data().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"portal-data.json\"",
            ),
        ],
        body,
    ))
}

/// POST /api/v1/portal/import - Replace the document with an exported one
///
/// The body is the raw exported text.
pub async fn import_portal(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<PortalData>, ApiError> {
    tracing::info!(bytes = body.len(), "Importing portal document");
    Ok(Json(state.store.import_data(&body).await?))
}

pub async fn reset_portal(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PortalData>, ApiError> {
    tracing::info!("Resetting portal document");
    Ok(Json(state.store.reset_data().await?))
}
