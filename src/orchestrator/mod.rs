//! Asynchronous two-stage routing orchestration.
//!
//! Submitting a [`RouteRequest`] inserts one row into the remote action table
//! with two derived columns declared: `decoded_tags` (vulnerability keywords) and
//! `route_analysis` (shelter choice, depending on `decoded_tags`). The service
//! fills both out of band; polling reads the row back, normalizes it and
//! extracts the decision.
//!
//! # Example
//!
//! ```rust,no_run
//! use saferoute::config::SafeRouteConfig;
//! use saferoute::orchestrator::{Orchestrator, RouteRequest};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), saferoute::orchestrator::OrchestratorError> {
//! let config = SafeRouteConfig::default().with_env_overrides();
//! let orchestrator = Orchestrator::new(&config);
//!
//! let request = RouteRequest::new("4 people, one bedridden, one cat", Some("Segamat, Johor".into()))?;
//! let result = orchestrator.analyze_route(&request, &CancellationToken::new()).await?;
//! println!("{}", result.selected_facility());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod poll;
pub mod prompts;
pub mod submit;
pub mod types;

pub use error::OrchestratorError;
pub use extract::{extract, Extraction};
pub use poll::CompletionPoller;
pub use submit::{BulkInsertOutcome, JobSubmitter, TableSetupOutcome};
pub use types::{Job, JobState, PollState, RouteRequest, RouteResult, RouteStatus};

use crate::config::{PollingConfig, SafeRouteConfig};
use crate::table::{HttpTableClient, TableClient};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Composes submission and polling behind one handle.
///
/// Holds no per-request state; share it across handlers behind an `Arc`.
pub struct Orchestrator {
    submitter: JobSubmitter,
    poller: CompletionPoller,
    polling: PollingConfig,
}

impl Orchestrator {
    /// Build an orchestrator talking HTTP to the configured table service.
    pub fn new(config: &SafeRouteConfig) -> Self {
        let timeout = Duration::from_secs(config.remote.request_timeout_seconds);
        Self::with_client(config, Arc::new(HttpTableClient::with_timeout(timeout)))
    }

    /// Build an orchestrator over any [`TableClient`].
    pub fn with_client(config: &SafeRouteConfig, client: Arc<dyn TableClient>) -> Self {
        Self {
            submitter: JobSubmitter::new(
                Arc::clone(&client),
                config.remote.clone(),
                config.knowledge.clone(),
            ),
            poller: CompletionPoller::new(client, config.remote.clone()),
            polling: config.polling,
        }
    }

    pub fn polling(&self) -> PollingConfig {
        self.polling
    }

    /// Insert the routing row; returns as soon as the service accepts it.
    pub async fn submit(&self, request: &RouteRequest) -> Result<Job, OrchestratorError> {
        self.submitter.submit(request).await
    }

    /// One poll attempt for `row_id`.
    pub async fn poll(&self, row_id: &str) -> Result<RouteResult, OrchestratorError> {
        self.poller.poll(row_id).await
    }

    /// Wait for an already submitted job using the configured budget.
    pub async fn wait(
        &self,
        job: &mut Job,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, OrchestratorError> {
        self.poller
            .wait_for_completion(job, self.polling, cancel)
            .await
    }

    /// Submit and wait for completion.
    ///
    /// `TimedOut` carries the row id so the caller can keep polling.
    pub async fn analyze_route(
        &self,
        request: &RouteRequest,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, OrchestratorError> {
        let mut job = self.submit(request).await?;
        info!(row_id = %job.id, "Waiting for derived columns");
        self.wait(&mut job, cancel).await
    }

    /// Create the routing table; an existing table is left untouched.
    pub async fn create_table(&self) -> Result<TableSetupOutcome, OrchestratorError> {
        self.submitter.create_table().await
    }

    /// Upload the configured SOP and shelter listing as reference rows.
    pub async fn upload_knowledge(&self) -> Result<BulkInsertOutcome, OrchestratorError> {
        self.submitter.upload_knowledge().await
    }
}
