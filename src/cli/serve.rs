//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::{load_config, ServeArgs};
use crate::config::{LogFormat, SafeRouteConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI argument overrides
///
/// Precedence: CLI args > env vars > config file > defaults
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<SafeRouteConfig, Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Initialize tracing subscriber based on logging configuration
///
/// `RUST_LOG` takes precedence over the configured level and component levels.
pub fn init_tracing(
    config: &crate::config::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    if config.enable_content_logging {
        eprintln!(
            "WARNING: Content logging is enabled. Emergency descriptions will appear in logs."
        );
        eprintln!("         They may describe medical conditions. Use only for debugging.");
    }

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Wait for SIGINT or SIGTERM, then cancel `cancel_token`.
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Run the serve command
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args)?;

    init_tracing(&config.logging)?;

    tracing::info!("Starting SafeRoute server");
    tracing::debug!(?config, "Loaded configuration");

    if let Err(e) = config.remote.credentials() {
        tracing::warn!(error = %e, "Remote table credentials incomplete; submissions will fail until configured");
    }

    let app_state = Arc::new(AppState::new(Arc::new(config.clone())));
    let cancel_token = app_state.shutdown.clone();
    let app = create_router(Arc::clone(&app_state));

    let addr = config.server.bind_addr();
    tracing::info!(
        addr = %addr,
        table_id = %config.remote.table_id,
        poll_interval_ms = config.polling.interval_ms,
        max_attempts = config.polling.max_attempts,
        "SafeRoute API server listening"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    tracing::info!("SafeRoute server stopped");
    Ok(())
}
