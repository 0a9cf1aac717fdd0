//! Error types for routing orchestration

use crate::config::ConfigError;
use crate::table::TableError;
use thiserror::Error;

/// Errors surfaced by submission and polling.
///
/// `TimedOut` is not a failure of the job: the remote row may still complete,
/// and callers are expected to resume polling with the same id.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Required input missing or malformed; never retried
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Every candidate endpoint rejected the row insertion
    #[error("Submission failed after trying {} endpoint(s) (last status: {})", .tried_endpoints.len(), status_label(.last_status))]
    Submission {
        tried_endpoints: Vec<String>,
        last_status: Option<u16>,
    },

    /// A single poll attempt failed in a way worth retrying
    #[error("Poll attempt failed: {0}")]
    TransientPoll(#[source] TableError),

    /// Attempt budget exhausted before both derived columns were populated
    #[error("Job '{job_id}' still processing after {attempts} attempt(s)")]
    TimedOut { job_id: String, attempts: u32 },

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// Retrying cannot help (malformed job id, auth rejection)
    #[error("Unrecoverable: {0}")]
    Unrecoverable(String),

    /// The caller stopped waiting
    #[error("Cancelled while waiting for completion")]
    Cancelled,
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no response".to_string(),
    }
}

impl OrchestratorError {
    /// Whether this error means "still working" rather than "broken".
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            OrchestratorError::TransientPoll(_) | OrchestratorError::TimedOut { .. }
        )
    }
}
