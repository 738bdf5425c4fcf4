//! Application and contact message intake

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use folio_core::models::{
    ApplicationData, ApplicationStatus, ContactMessage, InboxRecord, MessageStatus,
};
use folio_core::Fields;
use folio_store::InboxStore;

use crate::dto::{DeleteResponse, StatusRequest};
use crate::error::ApiError;
use crate::state::AppState;

async fn submit<R: InboxRecord>(
    inbox: &dyn InboxStore<R>,
    fields: Fields,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let record = inbox.submit(fields).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn set_status<R: InboxRecord>(
    inbox: &dyn InboxStore<R>,
    id: &str,
    status: R::Status,
) -> Result<Json<R>, ApiError> {
    let record = inbox
        .set_status(id, status)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No {} with id {}", R::KIND, id)))?;
    tracing::info!(kind = R::KIND, id = %id, status = %status, "Status changed");
    Ok(Json(record))
}

async fn delete<R: InboxRecord>(
    inbox: &dyn InboxStore<R>,
    id: &str,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !inbox.delete(id).await? {
        return Err(ApiError::not_found(format!("No {} with id {}", R::KIND, id)));
    }
    Ok(Json(DeleteResponse::success(R::KIND, id)))
}

pub async fn list_applications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ApplicationData>>, ApiError> {
    Ok(Json(state.applications.list().await?))
}

pub async fn submit_application(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<Fields>,
) -> Result<(StatusCode, Json<ApplicationData>), ApiError> {
    submit(state.applications.as_ref(), fields).await
}

pub async fn set_application_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<ApplicationData>, ApiError> {
    let status: ApplicationStatus = request.status.parse()?;
    set_status(state.applications.as_ref(), &id, status).await
}

pub async fn delete_application(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    delete(state.applications.as_ref(), &id).await
}

pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    Ok(Json(state.messages.list().await?))
}

pub async fn submit_message(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<Fields>,
) -> Result<(StatusCode, Json<ContactMessage>), ApiError> {
    submit(state.messages.as_ref(), fields).await
}

pub async fn mark_message_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ContactMessage>, ApiError> {
    set_status(state.messages.as_ref(), &id, MessageStatus::Read).await
}

pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    delete(state.messages.as_ref(), &id).await
}
