//! Analyze and poll command implementations

use crate::cli::output::{format_route_json, format_route_table, RouteView};
use crate::cli::{load_config, AnalyzeArgs, PollArgs};
use crate::orchestrator::{Orchestrator, OrchestratorError, RouteRequest};
use tokio_util::sync::CancellationToken;

/// Handle `saferoute analyze`
///
/// Submits, then waits with the configured budget. Ctrl-C stops the wait and
/// reports the row as still processing.
pub async fn handle_analyze(args: &AnalyzeArgs) -> Result<String, Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;
    if let Some(max_attempts) = args.max_attempts {
        config.polling.max_attempts = max_attempts.max(1);
    }

    let request = RouteRequest::new(args.text.clone(), args.location.clone())?;
    let orchestrator = Orchestrator::new(&config);
    let mut job = orchestrator.submit(&request).await?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let outcome = orchestrator.wait(&mut job, &cancel).await;
    ctrl_c.abort();

    let view = match outcome {
        Ok(result) => RouteView::from_result(&job.id, &result),
        Err(OrchestratorError::TimedOut { attempts, .. }) => RouteView::still_processing(
            &job.id,
            format!(
                "Still processing after {} attempt(s); run `saferoute poll {}` later",
                attempts, job.id
            ),
        ),
        Err(OrchestratorError::Cancelled) => RouteView::still_processing(
            &job.id,
            format!("Wait interrupted; run `saferoute poll {}` later", job.id),
        ),
        Err(e) => return Err(e.into()),
    };

    render(&view, args.json)
}

/// Handle `saferoute poll`
pub async fn handle_poll(args: &PollArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let orchestrator = Orchestrator::new(&config);

    let view = match orchestrator.poll(&args.row_id).await {
        Ok(result) => RouteView::from_result(&args.row_id, &result),
        Err(OrchestratorError::TransientPoll(e)) => {
            RouteView::still_processing(&args.row_id, format!("Poll attempt failed: {}", e))
        }
        Err(e) => return Err(e.into()),
    };

    render(&view, args.json)
}

fn render(view: &RouteView, json: bool) -> Result<String, Box<dyn std::error::Error>> {
    if json {
        Ok(format_route_json(view)?)
    } else {
        Ok(format_route_table(view))
    }
}
