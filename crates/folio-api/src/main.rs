use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use folio_core::config::{LayeredConfig, CONFIG_FILE_NAME};
use folio_store::open_storage;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_api=info,folio_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    let storage_config = LayeredConfig::with_defaults()
        .load_from_optional_file(CONFIG_FILE_NAME)?
        .load_from_env();

    tracing::info!(
        port = config.port,
        backend = %storage_config.backend.value,
        "Starting Folio API server"
    );

    let storage = open_storage(&storage_config).await.with_context(|| {
        format!(
            "Failed to open {} storage. Check {} and the FOLIO_* environment variables.",
            storage_config.backend.value, CONFIG_FILE_NAME
        )
    })?;
    let state = Arc::new(AppState::new(storage));

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid FOLIO_CORS_ORIGIN: {}", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state, &config).layer(cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await?;
    Ok(())
}
