//! Knowledge command implementation

use crate::cli::{load_config, KnowledgeUploadArgs};
use crate::orchestrator::Orchestrator;

/// Handle `saferoute knowledge upload`
pub async fn handle_knowledge_upload(
    args: &KnowledgeUploadArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let orchestrator = Orchestrator::new(&config);

    let outcome = orchestrator.upload_knowledge().await?;
    Ok(format!(
        "✓ Uploaded {} knowledge row(s) to table '{}' via {}",
        outcome.rows, config.remote.table_id, outcome.endpoint
    ))
}
