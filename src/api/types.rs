//! Request and response types for the routing API.

use crate::orchestrator::{OrchestratorError, RouteResult};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

/// Body accepted by `/api/analyze`, `/api/submit` and `/api/find_safe_shelter`.
///
/// `/api/analyze` polls when `row_id` is present and submits otherwise.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalyzeRequest {
    #[serde(default, alias = "description")]
    pub user_input: String,
    #[serde(default, alias = "location", skip_serializing_if = "Option::is_none")]
    pub location_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
}

impl AnalyzeRequest {
    /// Non-empty row id, if the caller sent one.
    pub fn poll_target(&self) -> Option<&str> {
        self.row_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// 202 answer to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmitResponse {
    pub status: String,
    pub row_id: String,
}

impl SubmitResponse {
    pub fn submitted(row_id: impl Into<String>) -> Self {
        Self {
            status: "submitted".to_string(),
            row_id: row_id.into(),
        }
    }
}

/// Poll answer; always sent with 200 so "still working" never looks broken.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PollResponse {
    Pending {
        row_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error_details: Option<String>,
    },
    Complete {
        row_id: String,
        analysis: String,
        tags: String,
        selected_facility: String,
    },
    Error {
        error_details: String,
    },
}

impl PollResponse {
    pub fn pending(row_id: &str) -> Self {
        PollResponse::Pending {
            row_id: row_id.to_string(),
            message: None,
            error_details: None,
        }
    }

    /// Pending answer telling the client where to continue.
    pub fn still_processing(row_id: &str) -> Self {
        PollResponse::Pending {
            row_id: row_id.to_string(),
            message: Some(format!(
                "Still processing; poll /api/poll/{} for the result",
                row_id
            )),
            error_details: None,
        }
    }

    pub fn from_result(row_id: &str, result: &RouteResult) -> Self {
        if result.is_complete() {
            PollResponse::Complete {
                row_id: row_id.to_string(),
                analysis: result.analysis_text().to_string(),
                tags: result.decoded_tags().to_string(),
                selected_facility: result.selected_facility().to_string(),
            }
        } else {
            Self::pending(row_id)
        }
    }

    /// Map a poll/wait outcome onto the 200-level answer.
    ///
    /// Returns `Err` only for conditions the caller must fix before polling can
    /// work at all (configuration).
    pub fn from_outcome(
        row_id: &str,
        outcome: Result<RouteResult, OrchestratorError>,
    ) -> Result<Self, ApiError> {
        match outcome {
            Ok(result) => Ok(Self::from_result(row_id, &result)),
            Err(OrchestratorError::TransientPoll(e)) => Ok(PollResponse::Pending {
                row_id: row_id.to_string(),
                message: None,
                error_details: Some(e.to_string()),
            }),
            Err(OrchestratorError::TimedOut { .. }) | Err(OrchestratorError::Cancelled) => {
                Ok(Self::still_processing(row_id))
            }
            Err(e @ OrchestratorError::Configuration(_)) => Err(ApiError::from(e)),
            Err(e) => Ok(PollResponse::Error {
                error_details: e.to_string(),
            }),
        }
    }
}

/// Health answer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Whether URL, project and token are all configured
    pub remote_configured: bool,
    pub table_id: String,
}

/// Error response envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    fn new(message: &str, r#type: &str, param: Option<&str>, code: &str) -> Self {
        Self {
            error: ApiErrorBody {
                message: message.to_string(),
                r#type: r#type.to_string(),
                param: param.map(str::to_string),
                code: Some(code.to_string()),
            },
        }
    }

    /// Create a bad request error (400).
    pub fn bad_request(message: &str, param: Option<&str>) -> Self {
        Self::new(message, "invalid_request_error", param, "invalid_request_error")
    }

    /// Create a bad gateway error (502).
    pub fn bad_gateway(message: &str) -> Self {
        Self::new(message, "server_error", None, "bad_gateway")
    }

    /// Remote credentials missing (500).
    pub fn configuration(message: &str) -> Self {
        Self::new(message, "server_error", None, "configuration_error")
    }

    /// Create a service unavailable error (503).
    pub fn service_unavailable(message: &str) -> Self {
        Self::new(message, "server_error", None, "service_unavailable")
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.error.code.as_deref() {
            Some("invalid_request_error") => StatusCode::BAD_REQUEST,
            Some("bad_gateway") => StatusCode::BAD_GATEWAY,
            Some("service_unavailable") => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        let message = err.to_string();
        match err {
            OrchestratorError::Validation(_) => ApiError::bad_request(&message, Some("user_input")),
            OrchestratorError::Configuration(_) => ApiError::configuration(&message),
            OrchestratorError::Submission { .. } | OrchestratorError::Unrecoverable(_) => {
                ApiError::bad_gateway(&message)
            }
            OrchestratorError::Cancelled => ApiError::service_unavailable(&message),
            OrchestratorError::TransientPoll(_) | OrchestratorError::TimedOut { .. } => {
                ApiError::service_unavailable(&message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
