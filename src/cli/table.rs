//! Table command implementation

use crate::cli::{load_config, TableCreateArgs};
use crate::orchestrator::Orchestrator;

/// Handle `saferoute table create`
pub async fn handle_table_create(
    args: &TableCreateArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let orchestrator = Orchestrator::new(&config);

    let outcome = orchestrator.create_table().await?;
    let verb = if outcome.created {
        "Created"
    } else {
        "Found existing"
    };
    Ok(format!(
        "✓ {} routing table '{}' via {}",
        verb, config.remote.table_id, outcome.endpoint
    ))
}
