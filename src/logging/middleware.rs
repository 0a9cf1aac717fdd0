//! Request ID middleware

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the correlation id in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Caller-supplied ids longer than this are replaced with a fresh one.
const MAX_INBOUND_ID_LEN: usize = 64;

/// Generate a new request ID using UUID v4
///
/// # Examples
///
/// ```
/// use saferoute::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert_eq!(request_id.len(), 36);
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Run the rest of the stack inside a `request` span carrying `request_id`.
///
/// Reuses a well-formed inbound `x-request-id`, otherwise generates one, and
/// echoes it on the response.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_acceptable_id(v))
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn is_acceptable_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_INBOUND_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_id_format() {
        let id = generate_request_id();
        // UUID v4 format: xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx
        assert_eq!(id.len(), 36);
        assert_eq!(id.chars().filter(|&c| c == '-').count(), 4);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_generate_request_id_uniqueness() {
        assert_ne!(generate_request_id(), generate_request_id());
    }

    #[test]
    fn test_inbound_id_acceptance() {
        assert!(is_acceptable_id("abc-123_x"));
        assert!(!is_acceptable_id(""));
        assert!(!is_acceptable_id("has space"));
        assert!(!is_acceptable_id(&"a".repeat(65)));
    }
}
