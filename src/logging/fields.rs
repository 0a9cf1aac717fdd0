//! Field helpers for structured logging

use crate::orchestrator::{OrchestratorError, RouteResult};

/// Characters kept in a content preview.
const PREVIEW_CHARS: usize = 100;

/// Privacy-safe preview of caller free text.
///
/// Returns `None` unless content logging is enabled. When enabled, returns the
/// first ~100 characters with newlines flattened.
///
/// # Examples
///
/// ```
/// use saferoute::logging::preview_text;
///
/// assert_eq!(preview_text("2 adults, 1 cat", false), None);
/// assert_eq!(preview_text("2 adults, 1 cat", true).as_deref(), Some("2 adults, 1 cat"));
/// ```
pub fn preview_text(text: &str, enable_content_logging: bool) -> Option<String> {
    if !enable_content_logging {
        return None;
    }

    let flattened: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    match flattened.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => Some(format!("{}...", &flattened[..idx])),
        None => Some(flattened),
    }
}

/// Short label for the outcome of a poll or wait, used as a log field.
pub fn outcome_label(result: &Result<RouteResult, OrchestratorError>) -> &'static str {
    match result {
        Ok(r) if r.is_complete() => "complete",
        Ok(_) => "pending",
        Err(OrchestratorError::TransientPoll(_)) | Err(OrchestratorError::TimedOut { .. }) => {
            "pending"
        }
        Err(OrchestratorError::Cancelled) => "cancelled",
        Err(OrchestratorError::Validation(_)) => "invalid",
        Err(_) => "error",
    }
}
