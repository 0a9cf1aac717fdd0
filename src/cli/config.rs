//! Config command handlers

use crate::cli::ConfigInitArgs;
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../saferoute.example.toml");

/// Handle `saferoute config init` command
///
/// Refuses to replace an existing file unless `--force` is given.
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<String, Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    Ok(format!(
        "✓ Configuration file created: {}\n  Set JAMAI_API_URL, JAMAI_PROJECT_ID and JAMAI_PAT, or fill in [remote].",
        args.output.display()
    ))
}
