//! Health check endpoint

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub generated_count: usize,
    pub pushed_count: usize,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (generated_count, pushed_count) = state.store.counts().await;
    Json(HealthResponse {
        status: "healthy",
        generated_count,
        pushed_count,
    })
}
