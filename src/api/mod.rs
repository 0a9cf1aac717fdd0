//! # Routing API
//!
//! HTTP surface over the [`Orchestrator`].
//!
//! ## Endpoints
//!
//! - `POST /api/submit` - Insert a routing row, answers 202 with `row_id`
//! - `GET /api/poll/{row_id}` - One poll attempt
//! - `POST /api/analyze` - Poll when the body has `row_id`, submit otherwise
//! - `POST /api/find_safe_shelter` - Submit and wait inside the request
//! - `GET /api/health` - Liveness and remote configuration status
//!
//! ## Example
//!
//! ```no_run
//! use saferoute::api::{create_router, AppState};
//! use saferoute::config::SafeRouteConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(SafeRouteConfig::default().with_env_overrides());
//! let state = Arc::new(AppState::new(config));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Poll answers are always 200 and carry `status` of `pending`, `complete` or
//! `error`. Submission problems use the error envelope:
//! ```json
//! {
//!   "error": {
//!     "message": "Invalid request: user_input is required",
//!     "type": "invalid_request_error",
//!     "param": "user_input",
//!     "code": "invalid_request_error"
//!   }
//! }
//! ```

mod analyze;
mod health;
mod shelter;
pub mod types;

pub use types::*;

use crate::config::SafeRouteConfig;
use crate::logging::request_id_layer;
use crate::orchestrator::Orchestrator;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Maximum request body size (64 KB).
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<SafeRouteConfig>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    /// Cancelled on shutdown; blocking waits derive child tokens from it
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Create application state with an HTTP-backed orchestrator.
    pub fn new(config: Arc<SafeRouteConfig>) -> Self {
        let orchestrator = Arc::new(Orchestrator::new(&config));
        Self::with_orchestrator(config, orchestrator)
    }

    pub fn with_orchestrator(config: Arc<SafeRouteConfig>, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            config,
            start_time: Instant::now(),
            shutdown: CancellationToken::new(),
        }
    }
}

/// Create the API router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let request_timeout = state.config.server.request_timeout();

    Router::new()
        .route("/api/analyze", post(analyze::handle_analyze))
        .route("/api/submit", post(analyze::handle_submit))
        .route("/api/poll/:row_id", get(analyze::handle_poll))
        .route("/api/find_safe_shelter", post(shelter::handle))
        .route("/api/health", get(health::handle))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_layer))
        .with_state(state)
}
