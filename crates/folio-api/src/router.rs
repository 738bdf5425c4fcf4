use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>, config: &ApiConfig) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Whole document
        .route("/api/v1/portal", get(handlers::get_portal))
        .route("/api/v1/portal/refresh", post(handlers::refresh_portal))
        .route("/api/v1/portal/export", get(handlers::export_portal))
        .route("/api/v1/portal/import", post(handlers::import_portal))
        .route("/api/v1/portal/reset", post(handlers::reset_portal))
        .route("/api/v1/about", patch(handlers::update_about))

        // Section records
        .route(
            "/api/v1/sections/{section}",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/api/v1/sections/{section}/{id}",
            patch(handlers::update_record).delete(handlers::delete_record),
        )
        .route("/api/v1/research/bibtex", post(handlers::import_bibtex))

        // Inboxes
        .route(
            "/api/v1/applications",
            get(handlers::list_applications).post(handlers::submit_application),
        )
        .route(
            "/api/v1/applications/{id}/status",
            patch(handlers::set_application_status),
        )
        .route("/api/v1/applications/{id}", delete(handlers::delete_application))
        .route(
            "/api/v1/messages",
            get(handlers::list_messages).post(handlers::submit_message),
        )
        .route("/api/v1/messages/{id}/read", post(handlers::mark_message_read))
        .route("/api/v1/messages/{id}", delete(handlers::delete_message))

        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
