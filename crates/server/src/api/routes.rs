use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::middleware::{auth_middleware, metrics_middleware};
use super::{convert, handlers};
use crate::state::AppState;

/// Maximum accepted request body, large enough for raw video uploads.
const MAX_BODY_BYTES: usize = 256 * 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Conversion routes require authentication; health, config and metrics
    // stay open for probes and scrapers.
    let convert_routes = Router::new()
        .route("/convert/audio", post(convert::convert_audio))
        .route("/convert/gif", post(convert::convert_gif))
        .route("/convert/video", post(convert::convert_video))
        .route("/convert/image", post(convert::convert_image))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        .merge(convert_routes)
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config().server.allowed_origins))
}

/// Builds the CORS layer from configured origins. An empty list or a lone
/// `*` entry allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "ignoring invalid allowed origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
