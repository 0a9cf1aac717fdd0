//! Integration tests for the routing API.
//!
//! The router is driven in-process; the table service is a wiremock server.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use serde_json::{json, Value};
use std::time::Duration;
use tower::Service;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_degraded_without_credentials() {
    let mut app = app(unconfigured());

    let response = app.call(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["remote_configured"], false);
    assert_eq!(body["table_id"], "emergency_routing");
}

#[tokio::test]
async fn test_health_ok_when_configured() {
    let server = MockServer::start().await;
    let mut app = app(config_for(&server));

    let body = body_json(app.call(get("/api/health")).await.unwrap()).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let mut app = app(unconfigured());
    let request = Request::builder()
        .uri("/api/health")
        .header("x-request-id", "trace-abc_123")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-abc_123");
}

#[tokio::test]
async fn test_submit_returns_accepted_with_row_id() {
    let server = MockServer::start().await;
    mount_submit(&server, "row-api").await;
    let mut app = app(config_for(&server));

    let response = app
        .call(post_json(
            "/api/submit",
            json!({ "user_input": "2 adults, 1 wheelchair user", "location_details": "Kluang" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["row_id"], "row-api");
}

#[tokio::test]
async fn test_analyze_without_row_id_submits() {
    let server = MockServer::start().await;
    mount_submit(&server, "row-new").await;
    let mut app = app(config_for(&server));

    let response = app
        .call(post_json("/api/analyze", json!({ "description": "family of 5" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["row_id"], "row-new");
}

#[tokio::test]
async fn test_analyze_blank_input_is_bad_request_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(submitted_body("never")))
        .expect(0)
        .mount(&server)
        .await;
    let mut app = app(config_for(&server));

    let response = app
        .call(post_json("/api/analyze", json!({ "user_input": "  " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert_eq!(body["error"]["param"], "user_input");
}

#[tokio::test]
async fn test_analyze_with_row_id_polls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(poll_path("row-done")))
        .respond_with(ResponseTemplate::new(200).set_body_json(complete_row(
            "row-done",
            "Considered both.\nBEST MATCH: SK Bukit Siput",
        )))
        .mount(&server)
        .await;
    let mut app = app(config_for(&server));

    let response = app
        .call(post_json("/api/analyze", json!({ "row_id": "row-done" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "complete");
    assert_eq!(body["row_id"], "row-done");
    assert_eq!(body["selected_facility"], "SK Bukit Siput");
    assert_eq!(body["tags"], "4 Pax, Medical/Bedridden, Pet/Cat");
}

#[tokio::test]
async fn test_poll_unknown_row_is_pending() {
    let server = MockServer::start().await;
    let mut app = app(config_for(&server));

    let response = app.call(get("/api/poll/row-missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["row_id"], "row-missing");
}

#[tokio::test]
async fn test_poll_upstream_failure_is_pending_with_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    let mut app = app(config_for(&server));

    let body = body_json(app.call(get("/api/poll/row-x")).await.unwrap()).await;
    assert_eq!(body["status"], "pending");
    assert!(body["error_details"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_poll_rejected_credentials_is_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let mut app = app(config_for(&server));

    let response = app.call(get("/api/poll/row-x")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "error");
}

#[tokio::test]
async fn test_submit_without_credentials_is_server_error() {
    let mut app = app(unconfigured());

    let response = app
        .call(post_json("/api/submit", json!({ "user_input": "3 people" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["error"]["code"],
        "configuration_error"
    );
}

#[tokio::test]
async fn test_submit_exhaustion_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let mut app = app(config_for(&server));

    let response = app
        .call(post_json("/api/submit", json!({ "user_input": "3 people" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_find_safe_shelter_waits_for_completion() {
    let server = MockServer::start().await;
    mount_submit(&server, "row-wait").await;
    Mock::given(method("GET"))
        .and(path(poll_path("row-wait")))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_row("row-wait")))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(poll_path("row-wait")))
        .respond_with(ResponseTemplate::new(200).set_body_json(complete_row(
            "row-wait",
            "BEST MATCH: Dewan Orang Ramai Labis",
        )))
        .mount(&server)
        .await;
    let mut app = app(config_for(&server));

    let response = app
        .call(post_json(
            "/api/find_safe_shelter",
            json!({ "user_input": "elderly couple", "location": "Labis" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "complete");
    assert_eq!(body["selected_facility"], "Dewan Orang Ramai Labis");
}

#[tokio::test]
async fn test_find_safe_shelter_budget_exhausted_is_pending() {
    let server = MockServer::start().await;
    mount_submit(&server, "row-long").await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_row("row-long")))
        .mount(&server)
        .await;
    let mut config = config_for(&server);
    config.polling.max_attempts = 2;
    let mut app = app(config);

    let body = body_json(
        app.call(post_json(
            "/api/find_safe_shelter",
            json!({ "user_input": "single mother, 3 children" }),
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["row_id"], "row-long");
    assert!(body["message"].as_str().unwrap().contains("/api/poll/row-long"));
}

#[tokio::test]
async fn test_find_safe_shelter_slow_service_answers_before_request_timeout() {
    let server = MockServer::start().await;
    mount_submit(&server, "row-slow").await;
    Mock::given(method("GET"))
        .and(path(poll_path("row-slow")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(pending_row("row-slow"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let mut config = config_for(&server);
    config.server.request_timeout_seconds = 2;
    let mut app = app(config);

    let response = app
        .call(post_json(
            "/api/find_safe_shelter",
            json!({ "user_input": "wheelchair user, oxygen tank" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["row_id"], "row-slow");
    assert!(body["message"].as_str().unwrap().contains("/api/poll/row-slow"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let mut app = app(unconfigured());
    let response = app.call(get("/v1/chat/completions")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
