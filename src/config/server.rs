//! HTTP server configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Listener settings for `saferoute serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole request, including blocking waits on
    /// `/api/find_safe_shelter`.
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_seconds: 90,
        }
    }
}

impl ServerConfig {
    /// `host:port` string handed to the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// How long a blocking wait may run before answering `pending`.
    ///
    /// Finishes ahead of the request timeout so the row id still reaches the
    /// client instead of a bare 408.
    pub fn wait_deadline(&self) -> Duration {
        let timeout = self.request_timeout();
        timeout
            .checked_sub(WAIT_MARGIN)
            .filter(|d| !d.is_zero())
            .unwrap_or(timeout / 2)
    }
}

/// Head start the blocking wait leaves for writing its response.
const WAIT_MARGIN: Duration = Duration::from_millis(500);
