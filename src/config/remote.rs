//! Remote generative-table service configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection settings for the hosted table service.
///
/// Read once at startup and shared read-only afterwards. Missing credentials
/// are tolerated here and only rejected by [`RemoteConfig::credentials`], which
/// the orchestrator calls before its first network request.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the service, e.g. `https://api.jamaibase.com`
    pub api_url: String,
    pub project_id: String,
    /// Personal access token sent as a Bearer credential
    pub token: String,
    /// Action table receiving routing requests
    pub table_id: String,
    /// Generative table kind (`action`, `knowledge`, `chat`)
    pub table_type: String,
    /// Explicit add-rows URL tried before any derived candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_api_url: Option<String>,
    /// Model requested for both derived columns
    pub model: String,
    pub request_timeout_seconds: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            project_id: String::new(),
            token: String::new(),
            table_id: "emergency_routing".to_string(),
            table_type: "action".to_string(),
            table_api_url: None,
            model: "gemini-2.5-flash".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

// Hand-written so the token never reaches a log line.
impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_url", &self.api_url)
            .field("project_id", &self.project_id)
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("table_id", &self.table_id)
            .field("table_type", &self.table_type)
            .field("table_api_url", &self.table_api_url)
            .field("model", &self.model)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

/// Validated credentials, proof that the remote service can be addressed.
///
/// The base URL is checked alongside them but lives on the resolved endpoints.
#[derive(Clone)]
pub struct Credentials {
    pub project_id: String,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl RemoteConfig {
    /// Apply `JAMAI_*` / `ACTION_TABLE_ID` environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("JAMAI_API_URL") {
            self.api_url = url;
        }
        if let Ok(project) = std::env::var("JAMAI_PROJECT_ID") {
            self.project_id = project;
        }
        if let Ok(token) = std::env::var("JAMAI_PAT") {
            self.token = token;
        }
        if let Ok(table) = std::env::var("ACTION_TABLE_ID") {
            if !table.trim().is_empty() {
                self.table_id = table;
            }
        }
        if let Ok(url) = std::env::var("JAMAI_TABLE_API_URL") {
            self.table_api_url = if url.trim().is_empty() { None } else { Some(url) };
        }
    }

    /// True when every credential needed for a submission is present.
    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }

    /// Return the credentials, or the first missing one as a configuration error.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let required: [(&str, &'static str, &'static str); 3] = [
            (self.api_url.as_str(), "api_url", "JAMAI_API_URL"),
            (self.project_id.as_str(), "project_id", "JAMAI_PROJECT_ID"),
            (self.token.as_str(), "token", "JAMAI_PAT"),
        ];
        for (value, field, env_var) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingCredential { field, env_var });
            }
        }

        Ok(Credentials {
            project_id: self.project_id.trim().to_string(),
            token: self.token.trim().to_string(),
        })
    }
}
