use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// `false` means every comment comes from the canned pools.
    pub generation_enabled: bool,
}

/// Liveness probe.
pub async fn health_route(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::success(HealthStatus {
        status: "ok",
        generation_enabled: state.composer.generation_enabled(),
    })
    .into_response_with_status(StatusCode::OK)
}
