//! Submit and poll endpoint handlers.

use crate::api::{AnalyzeRequest, ApiError, AppState, PollResponse, SubmitResponse};
use crate::logging::{outcome_label, preview_text};
use crate::orchestrator::RouteRequest;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// POST /api/analyze - Poll when `row_id` is given, otherwise submit.
pub async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, ApiError> {
    if let Some(row_id) = request.poll_target().map(str::to_string) {
        return Ok(poll_row(&state, &row_id).await?.into_response());
    }
    Ok(submit_row(&state, request).await?.into_response())
}

/// POST /api/submit - Insert the routing row and return its id.
pub async fn handle_submit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, ApiError> {
    Ok(submit_row(&state, request).await?.into_response())
}

/// GET /api/poll/{row_id} - One poll attempt.
pub async fn handle_poll(
    State(state): State<Arc<AppState>>,
    Path(row_id): Path<String>,
) -> Result<Json<PollResponse>, ApiError> {
    poll_row(&state, &row_id).await
}

async fn submit_row(
    state: &AppState,
    request: AnalyzeRequest,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let route = RouteRequest::new(request.user_input, request.location_details)?;

    info!(
        location = route.location_details(),
        preview = ?preview_text(route.user_input(), state.config.logging.enable_content_logging),
        "Routing request received"
    );

    let job = state.orchestrator.submit(&route).await.map_err(|e| {
        warn!(error = %e, "Submission failed");
        ApiError::from(e)
    })?;

    Ok((StatusCode::ACCEPTED, Json(SubmitResponse::submitted(job.id))))
}

pub(crate) async fn poll_row(state: &AppState, row_id: &str) -> Result<Json<PollResponse>, ApiError> {
    let outcome = state.orchestrator.poll(row_id).await;
    info!(row_id, outcome = outcome_label(&outcome), "Poll attempt");
    PollResponse::from_outcome(row_id, outcome).map(Json)
}
