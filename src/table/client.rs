//! HTTP transport for the remote table service.

use super::{Endpoint, TableError};
use crate::config::Credentials;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Upstream error bodies are cut to this many characters before being carried
/// in an error.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Successful (2xx) response from the table service.
#[derive(Debug, Clone, PartialEq)]
pub struct TableResponse {
    pub status: u16,
    /// Parsed JSON body; `Value::Null` when the body was empty.
    pub body: Value,
}

/// Transport seam between the orchestrator and the table service.
///
/// Implementations perform exactly one request per call and never retry;
/// candidate fallback and polling live in the orchestrator. Non-2xx answers are
/// returned as [`TableError::Upstream`].
#[async_trait]
pub trait TableClient: Send + Sync + 'static {
    async fn post_json(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
        body: &Value,
    ) -> Result<TableResponse, TableError>;

    async fn get_json(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<TableResponse, TableError>;
}

/// reqwest-backed [`TableClient`].
pub struct HttpTableClient {
    /// Shared HTTP client for connection pooling
    client: Arc<Client>,
    timeout: Duration,
}

impl HttpTableClient {
    pub fn new(client: Arc<Client>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Arc::new(Client::new()), timeout)
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<TableResponse, TableError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TableError::Timeout(self.timeout_ms())
            } else {
                TableError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TableError::Timeout(self.timeout_ms())
            } else {
                TableError::InvalidResponse(format!("Failed to read response body: {}", e))
            }
        })?;

        if !status.is_success() {
            return Err(TableError::Upstream {
                status: status.as_u16(),
                message: truncate_chars(&text, MAX_ERROR_BODY_CHARS),
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                TableError::InvalidResponse(format!("Response body is not JSON: {}", e))
            })?
        };

        Ok(TableResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> reqwest::RequestBuilder {
        let mut request = request
            .timeout(self.timeout)
            .bearer_auth(&credentials.token)
            .header("accept", "application/json");
        if !credentials.project_id.is_empty() {
            request = request.header("X-Project-Id", &credentials.project_id);
        }
        if !endpoint.query.is_empty() {
            request = request.query(&endpoint.query);
        }
        request
    }
}

#[async_trait]
impl TableClient for HttpTableClient {
    async fn post_json(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
        body: &Value,
    ) -> Result<TableResponse, TableError> {
        let request = self.authorize(self.client.post(&endpoint.url), endpoint, credentials);
        self.send(request.json(body)).await
    }

    async fn get_json(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<TableResponse, TableError> {
        let request = self.authorize(self.client.get(&endpoint.url), endpoint, credentials);
        self.send(request).await
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::PayloadShape;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials {
            project_id: "proj_1".to_string(),
            token: "pat-123".to_string(),
        }
    }

    fn endpoint(url: String) -> Endpoint {
        Endpoint {
            shape: PayloadShape::for_url(&url),
            url,
            query: Vec::new(),
        }
    }

    fn client() -> HttpTableClient {
        HttpTableClient::with_timeout(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_post_sends_auth_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/gen_tables/action/rows/add"))
            .and(header("authorization", "Bearer pat-123"))
            .and(header("x-project-id", "proj_1"))
            .and(body_json(json!({"table_id": "t"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
            .expect(1)
            .mount(&server)
            .await;

        let ep = endpoint(format!("{}/api/v2/gen_tables/action/rows/add", server.uri()));
        let response = client()
            .post_json(&ep, &credentials(), &json!({"table_id": "t"}))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({"rows": []}));
    }

    #[tokio::test]
    async fn test_get_appends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/gen_tables/action/rows/r1"))
            .and(query_param("table_id", "emergency_routing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ID": "r1"})))
            .mount(&server)
            .await;

        let mut ep = endpoint(format!("{}/api/v2/gen_tables/action/rows/r1", server.uri()));
        ep.query
            .push(("table_id".to_string(), "emergency_routing".to_string()));
        let response = client().get_json(&ep, &credentials()).await.unwrap();
        assert_eq!(response.body["ID"], "r1");
    }

    #[tokio::test]
    async fn test_non_success_maps_to_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&server)
            .await;

        let ep = endpoint(format!("{}/rows/x", server.uri()));
        let err = client().get_json(&ep, &credentials()).await.unwrap_err();
        assert!(matches!(
            err,
            TableError::Upstream { status: 401, ref message } if message == "invalid token"
        ));
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let ep = endpoint(format!("{}/v1/tables/t/rows", server.uri()));
        let response = client()
            .post_json(&ep, &credentials(), &json!({}))
            .await
            .unwrap();
        assert_eq!(response.body, Value::Null);
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let ep = endpoint(format!("{}/rows/x", server.uri()));
        let err = client().get_json(&ep, &credentials()).await.unwrap_err();
        assert!(matches!(err, TableError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpTableClient::with_timeout(Duration::from_millis(50));
        let ep = endpoint(format!("{}/rows/x", server.uri()));
        let err = client.get_json(&ep, &credentials()).await.unwrap_err();
        assert!(matches!(err, TableError::Timeout(50)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let ep = endpoint("http://127.0.0.1:1/rows/x".to_string());
        let err = client().get_json(&ep, &credentials()).await.unwrap_err();
        assert!(matches!(err, TableError::Network(_)));
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("ééééé", 2), "éé...");
    }
}
