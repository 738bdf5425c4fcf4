use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use folio_core::models::Section;
use folio_core::Fields;
use serde_json::Value;

use crate::dto::DeleteResponse;
use crate::error::ApiError;
use crate::state::AppState;

fn list_section(name: &str) -> Result<Section, ApiError> {
    let section: Section = name.parse()?;
    if !section.is_list() {
        return Err(ApiError::bad_request(format!(
            "Section '{}' is not a list; use /api/v1/about",
            section
        )));
    }
    Ok(section)
}

pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let section = list_section(&section)?;
    Ok(Json(state.store.list(section).await?))
}

pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
    Json(fields): Json<Fields>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let section = list_section(&section)?;
    let record = state.store.create(section, fields).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_record(
    State(state): State<Arc<AppState>>,
    Path((section, id)): Path<(String, String)>,
    Json(patch): Json<Fields>,
) -> Result<Json<Value>, ApiError> {
    let section = list_section(&section)?;
    state
        .store
        .update(section, &id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No {} record with id {}", section, id)))
}

pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path((section, id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let section = list_section(&section)?;
    if !state.store.delete(section, &id).await? {
        return Err(ApiError::not_found(format!("No {} record with id {}", section, id)));
    }
    Ok(Json(DeleteResponse::success(section.as_str(), &id)))
}
