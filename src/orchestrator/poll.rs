//! Completion polling.
//!
//! A single [`CompletionPoller::poll`] walks the poll candidates once and
//! reports whatever the row currently holds. [`CompletionPoller::wait_for_completion`]
//! drives that attempt on a fixed interval until the row completes, the budget
//! runs out, an unrecoverable error occurs, or the caller cancels.

use super::extract::extract;
use super::types::{Job, JobState, PollState, RouteResult};
use super::OrchestratorError;
use crate::config::{Credentials, PollingConfig, RemoteConfig};
use crate::table::{normalize, EndpointResolver, ErrorClass, Operation, TableClient, TableError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Longest row id accepted for polling.
const MAX_ROW_ID_LEN: usize = 128;

pub struct CompletionPoller {
    client: Arc<dyn TableClient>,
    resolver: EndpointResolver,
    remote: RemoteConfig,
}

impl CompletionPoller {
    pub fn new(client: Arc<dyn TableClient>, remote: RemoteConfig) -> Self {
        Self {
            client,
            resolver: EndpointResolver::new(&remote),
            remote,
        }
    }

    /// One poll attempt.
    ///
    /// Returns `Ok` with a pending result when no candidate knows the row yet.
    /// `TransientPoll` means at least one candidate failed in a retryable way and
    /// none produced row data; `Unrecoverable` ends polling for this id.
    pub async fn poll(&self, job_id: &str) -> Result<RouteResult, OrchestratorError> {
        validate_row_id(job_id)?;
        let credentials = self.remote.credentials()?;
        self.poll_once(job_id, &credentials).await
    }

    async fn poll_once(
        &self,
        job_id: &str,
        credentials: &Credentials,
    ) -> Result<RouteResult, OrchestratorError> {
        let mut transient: Option<TableError> = None;

        for endpoint in self.resolver.candidates(Operation::PollRow { row_id: job_id }) {
            match self.client.get_json(&endpoint, credentials).await {
                Ok(response) => {
                    let row = normalize(&response.body);
                    if row.is_empty() {
                        debug!(row_id = job_id, endpoint = %endpoint.url, "Row not populated yet");
                        continue;
                    }
                    let result = extract(&row).into_result(Some(row));
                    debug!(
                        row_id = job_id,
                        endpoint = %endpoint.url,
                        status = %result.status(),
                        "Poll attempt read row"
                    );
                    return Ok(result);
                }
                Err(e) => match e.classify() {
                    ErrorClass::NotFound => {
                        debug!(row_id = job_id, endpoint = %endpoint.url, "Poll endpoint reported not found");
                    }
                    ErrorClass::Transient => {
                        debug!(row_id = job_id, endpoint = %endpoint.url, error = %e, "Poll endpoint failed");
                        transient = Some(e);
                    }
                    ErrorClass::Unrecoverable => {
                        warn!(row_id = job_id, endpoint = %endpoint.url, error = %e, "Poll rejected");
                        return Err(OrchestratorError::Unrecoverable(e.to_string()));
                    }
                },
            }
        }

        match transient {
            Some(e) => Err(OrchestratorError::TransientPoll(e)),
            None => Ok(RouteResult::pending()),
        }
    }

    /// Poll `job` every `budget.interval()` for at most `budget.max_attempts`
    /// attempts.
    ///
    /// Transient failures are logged and count against the budget. On exhaustion
    /// the job stays `Pending` and `TimedOut` is returned; the row may still
    /// complete later. Cancellation stops the loop at the next suspension point.
    pub async fn wait_for_completion(
        &self,
        job: &mut Job,
        budget: PollingConfig,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, OrchestratorError> {
        validate_row_id(&job.id)?;
        let credentials = self.remote.credentials()?;
        job.state = JobState::Pending;

        let mut attempt = 0;
        let (state, outcome) = loop {
            if attempt >= budget.max_attempts {
                let timed_out = OrchestratorError::TimedOut {
                    job_id: job.id.clone(),
                    attempts: attempt,
                };
                break (PollState::TimedOut, Err(timed_out));
            }
            if attempt > 0 {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(OrchestratorError::Cancelled),
                    _ = tokio::time::sleep(budget.interval()) => {}
                }
            }
            attempt += 1;

            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(OrchestratorError::Cancelled),
                result = self.poll_once(&job.id, &credentials) => result,
            };

            let state = match &result {
                Ok(result) if result.is_complete() => PollState::Complete,
                Ok(_) => {
                    debug!(row_id = %job.id, attempt, "Still pending");
                    PollState::Pending
                }
                Err(OrchestratorError::TransientPoll(e)) => {
                    warn!(row_id = %job.id, attempt, error = %e, "Transient poll failure");
                    PollState::Pending
                }
                Err(_) => PollState::Errored,
            };
            if state.is_terminal() {
                break (state, result);
            }
        };

        match state {
            PollState::Complete => {
                job.state = JobState::Complete;
                info!(row_id = %job.id, attempts = attempt, "Routing row complete");
            }
            PollState::Errored => job.state = JobState::Failed,
            PollState::TimedOut | PollState::Pending => {
                info!(row_id = %job.id, attempts = attempt, "Poll budget exhausted, row still processing");
            }
        }
        outcome
    }
}

/// Row ids are opaque but must be safe to place in a URL path segment.
pub fn validate_row_id(row_id: &str) -> Result<(), OrchestratorError> {
    let valid = !row_id.is_empty()
        && row_id.len() <= MAX_ROW_ID_LEN
        && row_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid && row_id != "." && row_id != ".." {
        Ok(())
    } else {
        Err(OrchestratorError::Unrecoverable(format!(
            "malformed row id '{}'",
            row_id.chars().take(MAX_ROW_ID_LEN).collect::<String>()
        )))
    }
}
