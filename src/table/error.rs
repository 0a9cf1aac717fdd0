//! Error types for remote table transport.

use thiserror::Error;

/// Errors that can occur while talking to the remote table service.
#[derive(Error, Debug, Clone)]
pub enum TableError {
    /// Network connectivity error (DNS, connection refused, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded its deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Service answered with a non-2xx status.
    #[error("Table service error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Body could not be read or was not JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// How a failed request should be treated by callers that retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Endpoint or row does not exist (yet); try another candidate.
    NotFound,
    /// Worth retrying later: network trouble, 5xx, throttling, bad payload.
    Transient,
    /// Retrying cannot help: auth failures and other 4xx rejections.
    Unrecoverable,
}

impl TableError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TableError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn classify(&self) -> ErrorClass {
        match self {
            TableError::Upstream { status, .. } => match *status {
                404 | 405 | 410 => ErrorClass::NotFound,
                408 | 425 | 429 => ErrorClass::Transient,
                400..=499 => ErrorClass::Unrecoverable,
                _ => ErrorClass::Transient,
            },
            TableError::Network(_) | TableError::Timeout(_) | TableError::InvalidResponse(_) => {
                ErrorClass::Transient
            }
        }
    }
}
