//! Health check endpoint handler.

use crate::api::{AppState, HealthResponse};
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /api/health - Liveness plus remote configuration status.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let remote_configured = state.config.remote.has_credentials();

    Json(HealthResponse {
        status: if remote_configured { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        remote_configured,
        table_id: state.config.remote.table_id.clone(),
    })
}
