//! Shared test utilities for SafeRoute integration tests.
//!
//! Provides a configured [`SafeRouteConfig`] pointing at a wiremock server and
//! canned table-service payloads.

#![allow(dead_code)]

use saferoute::api::{create_router, AppState};
use saferoute::config::SafeRouteConfig;
use saferoute::orchestrator::Orchestrator;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Well-Known Paths
// =============================================================================

pub const SUBMIT_PATH: &str = "/api/v2/gen_tables/action/rows/add";
pub const SUBMIT_V1_PATH: &str = "/api/v1/gen_tables/action/rows/add";
pub const CREATE_TABLE_PATH: &str = "/api/v2/gen_tables/action";

/// First poll candidate for `row_id`.
pub fn poll_path(row_id: &str) -> String {
    format!("/api/v2/gen_tables/action/rows/{}", row_id)
}

// =============================================================================
// Config Builders
// =============================================================================

/// Config with credentials for `server` and a fast polling budget.
pub fn config_for(server: &MockServer) -> SafeRouteConfig {
    let mut config = SafeRouteConfig::default();
    config.remote.api_url = server.uri();
    config.remote.project_id = "proj_test".to_string();
    config.remote.token = "pat-test".to_string();
    config.remote.request_timeout_seconds = 1;
    config.polling.interval_ms = 10;
    config.polling.max_attempts = 10;
    config
}

/// Config with no remote credentials at all.
pub fn unconfigured() -> SafeRouteConfig {
    SafeRouteConfig::default()
}

pub fn orchestrator(config: &SafeRouteConfig) -> Orchestrator {
    Orchestrator::new(config)
}

pub fn app(config: SafeRouteConfig) -> axum::Router {
    let state = Arc::new(AppState::new(Arc::new(config)));
    create_router(state)
}

// =============================================================================
// Payloads
// =============================================================================

/// Add-rows answer carrying `row_id`.
pub fn submitted_body(row_id: &str) -> Value {
    json!({
        "object": "gen_table.completion.rows",
        "rows": [{ "object": "gen_table.completion.chunks", "row_id": row_id, "columns": {} }]
    })
}

/// A row whose derived columns have not run yet.
pub fn pending_row(row_id: &str) -> Value {
    json!({
        "ID": row_id,
        "user_input": { "value": "4 people" },
        "decoded_tags": { "value": null },
        "route_analysis": { "value": null }
    })
}

/// A row with both derived columns populated.
pub fn complete_row(row_id: &str, analysis: &str) -> Value {
    json!({
        "ID": row_id,
        "user_input": { "value": "4 people, one bedridden, one cat" },
        "decoded_tags": { "value": "4 Pax, Medical/Bedridden, Pet/Cat" },
        "route_analysis": { "value": analysis }
    })
}

/// Mount a submit mock answering with `row_id` on the first add-rows path.
pub async fn mount_submit(server: &MockServer, row_id: &str) {
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(submitted_body(row_id)))
        .mount(server)
        .await;
}
