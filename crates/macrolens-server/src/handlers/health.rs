//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub app: String,
    pub version: &'static str,
    pub status: &'static str,
}

/// GET / - Service name, version and liveness
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        app: state.settings.app_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}
