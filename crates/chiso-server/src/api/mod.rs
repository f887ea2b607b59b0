//! API routes and handlers

mod avatars;
mod debug;
mod health;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Upload payloads are capped well above any realistic clip+portrait pair.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Avatar lifecycle
        .route("/generate-avatar", post(avatars::generate))
        .route("/generated-avatars", get(avatars::list_generated))
        .route("/pushed-avatars", get(avatars::list_pushed))
        .route("/push-avatar/:id", post(avatars::push))
        .route("/avatar/:id", delete(avatars::delete_avatar))
        // Service introspection
        .route("/health", get(health::health_check))
        .route("/debug/files", get(debug::list_files));

    let static_dir = state.config.static_dir.clone();
    let index = static_dir.join("index.html");

    Router::new()
        .nest("/api", api_routes)
        // Generated videos are served read-only, keyed by filename
        .nest_service("/generated", ServeDir::new(&state.config.outputs_dir))
        .nest_service("/static", ServeDir::new(&static_dir))
        // Serve the frontend for everything else
        .fallback_service(ServeDir::new(&static_dir).fallback(ServeFile::new(index)))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
