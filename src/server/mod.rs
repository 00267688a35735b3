mod handlers;
mod state;
mod static_files;

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::config::AppConfig;

pub fn build_router(config: AppConfig) -> Router {
    let state = Arc::new(AppState { config });

    let api = Router::<Arc<AppState>>::new()
        .route("/api/markers", get(handlers::markers))
        .route("/api/nearest", get(handlers::nearest))
        .route("/api/locate", get(handlers::locate))
        .route("/api/location-error", get(handlers::location_error))
        .route("/api/config", get(handlers::map_config))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/style.css", get(handlers::style))
        .route("/app.js", get(handlers::script))
        .merge(api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn start(config: AppConfig) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server().host(), config.server().port());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve(listener, config).await
}

/// Serve on an already-bound listener.
pub async fn serve(listener: tokio::net::TcpListener, config: AppConfig) -> std::io::Result<()> {
    let app = build_router(config);

    info!("SOS Map server listening on http://{}", listener.local_addr()?);
    info!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}
