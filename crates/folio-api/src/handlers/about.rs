use std::sync::Arc;

use axum::{extract::State, Json};
use folio_core::models::About;
use folio_core::Fields;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn update_about(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<Fields>,
) -> Result<Json<About>, ApiError> {
    Ok(Json(state.store.update_about(patch).await?))
}
