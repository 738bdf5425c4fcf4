use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::dto::BibtexImportResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/v1/research/bibtex - Create research records from a .bib body
pub async fn import_bibtex(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<(StatusCode, Json<BibtexImportResponse>), ApiError> {
    let records = state.store.import_bibtex(&body).await?;
    tracing::info!(imported = records.len(), "BibTeX import finished");
    Ok((StatusCode::CREATED, Json(records.into())))
}
