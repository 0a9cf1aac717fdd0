//! Request, job and result types.

use super::OrchestratorError;
use crate::table::Row;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A validated routing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    user_input: String,
    location_details: String,
}

impl RouteRequest {
    /// Build a request, rejecting empty or whitespace-only input.
    pub fn new(
        user_input: impl Into<String>,
        location_details: Option<String>,
    ) -> Result<Self, OrchestratorError> {
        let user_input = user_input.into();
        if user_input.trim().is_empty() {
            return Err(OrchestratorError::Validation(
                "user_input is required".to_string(),
            ));
        }
        Ok(Self {
            user_input,
            location_details: location_details.unwrap_or_default(),
        })
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn location_details(&self) -> &str {
        &self.location_details
    }
}

/// Lifecycle of a submitted routing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Submitted,
    Pending,
    Complete,
    Failed,
}

/// Handle for a submitted row; the remote service owns the row itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    pub state: JobState,
}

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            submitted_at: Utc::now(),
            state: JobState::Submitted,
        }
    }

    /// Resume an existing row id, e.g. one returned to an earlier client.
    pub fn resume(id: impl Into<String>) -> Self {
        Self {
            state: JobState::Pending,
            ..Self::new(id)
        }
    }
}

/// Externally visible status of a [`RouteResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Pending,
    Complete,
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RouteStatus::Pending => "pending",
            RouteStatus::Complete => "complete",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of one poll attempt.
///
/// Only [`RouteResult::from_parts`] can yield `Complete`, and only when both the
/// analysis text and the selected facility are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResult {
    status: RouteStatus,
    analysis_text: String,
    decoded_tags: String,
    selected_facility: String,
    raw_row: Option<Row>,
}

impl RouteResult {
    pub fn pending() -> Self {
        Self {
            status: RouteStatus::Pending,
            analysis_text: String::new(),
            decoded_tags: String::new(),
            selected_facility: String::new(),
            raw_row: None,
        }
    }

    /// Assemble a result from extracted parts; status follows from content.
    pub fn from_parts(
        decoded_tags: String,
        analysis_text: String,
        selected_facility: String,
        raw_row: Option<Row>,
    ) -> Self {
        let complete = !analysis_text.trim().is_empty() && !selected_facility.trim().is_empty();
        Self {
            status: if complete {
                RouteStatus::Complete
            } else {
                RouteStatus::Pending
            },
            analysis_text,
            decoded_tags,
            selected_facility,
            raw_row,
        }
    }

    pub fn status(&self) -> RouteStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == RouteStatus::Complete
    }

    pub fn analysis_text(&self) -> &str {
        &self.analysis_text
    }

    pub fn decoded_tags(&self) -> &str {
        &self.decoded_tags
    }

    pub fn selected_facility(&self) -> &str {
        &self.selected_facility
    }

    pub fn raw_row(&self) -> Option<&Row> {
        self.raw_row.as_ref()
    }
}

/// Terminal and non-terminal states of the completion poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Pending,
    Complete,
    TimedOut,
    Errored,
}

impl PollState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PollState::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_request_rejects_blank_input() {
        assert!(matches!(
            RouteRequest::new("   ", None),
            Err(OrchestratorError::Validation(_))
        ));
        assert!(matches!(
            RouteRequest::new("", Some("Segamat".into())),
            Err(OrchestratorError::Validation(_))
        ));
    }

    #[test]
    fn test_route_request_defaults_location() {
        let request = RouteRequest::new("2 adults", None).unwrap();
        assert_eq!(request.user_input(), "2 adults");
        assert_eq!(request.location_details(), "");
    }

    #[test]
    fn test_partial_result_is_pending() {
        let only_analysis =
            RouteResult::from_parts(String::new(), "analysis".into(), String::new(), None);
        assert_eq!(only_analysis.status(), RouteStatus::Pending);

        let only_facility =
            RouteResult::from_parts(String::new(), " ".into(), "PPS North".into(), None);
        assert_eq!(only_facility.status(), RouteStatus::Pending);
    }

    #[test]
    fn test_full_result_is_complete() {
        let result = RouteResult::from_parts(
            "4 Pax".into(),
            "analysis".into(),
            "PPS North".into(),
            None,
        );
        assert!(result.is_complete());
        assert_eq!(result.selected_facility(), "PPS North");
    }

    #[test]
    fn test_job_lifecycle_defaults() {
        assert_eq!(Job::new("r1").state, JobState::Submitted);
        assert_eq!(Job::resume("r1").state, JobState::Pending);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&RouteStatus::Complete).unwrap(),
            "\"complete\""
        );
        assert_eq!(RouteStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_poll_state_terminality() {
        assert!(!PollState::Pending.is_terminal());
        assert!(PollState::Complete.is_terminal());
        assert!(PollState::TimedOut.is_terminal());
        assert!(PollState::Errored.is_terminal());
    }
}
