//! Blocking submit-and-wait endpoint.

use crate::api::{AnalyzeRequest, ApiError, AppState, PollResponse};
use crate::logging::outcome_label;
use crate::orchestrator::RouteRequest;
use axum::{extract::State, Json};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::info;

/// POST /api/find_safe_shelter - Submit, then wait inside the request.
///
/// The wait stops when the client disconnects (the handler future is dropped)
/// or when the server begins shutting down. An exhausted budget, or a wait
/// that reaches the request deadline, answers `pending` with the row id so the
/// client can continue with `/api/poll`.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<PollResponse>, ApiError> {
    let route = RouteRequest::new(request.user_input, request.location_details)?;
    let mut job = state.orchestrator.submit(&route).await?;

    let cancel = state.shutdown.child_token();
    let deadline = state.config.server.wait_deadline();
    let waited = timeout(deadline, state.orchestrator.wait(&mut job, &cancel)).await;
    let outcome = match waited {
        Ok(outcome) => outcome,
        Err(_) => {
            info!(
                row_id = %job.id,
                deadline_ms = deadline.as_millis() as u64,
                "Blocking wait reached request deadline"
            );
            return Ok(Json(PollResponse::still_processing(&job.id)));
        }
    };
    info!(
        row_id = %job.id,
        state = ?job.state,
        outcome = outcome_label(&outcome),
        "Blocking wait finished"
    );

    PollResponse::from_outcome(&job.id, outcome).map(Json)
}
