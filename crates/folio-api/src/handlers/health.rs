use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let backend = state.store.backend_name();
    match state.store.health().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::ok(backend))),
        Err(e) => {
            tracing::warn!(backend, error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unavailable(backend, e.to_string())),
            )
        }
    }
}
