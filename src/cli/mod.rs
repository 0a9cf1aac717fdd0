//! CLI module for SafeRoute
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP API
//! - `analyze` - Submit a request and wait for the routing decision
//! - `poll` - Run one poll attempt for an existing row id
//! - `table create` - Create the routing table with its derived columns
//! - `knowledge upload` - Upload the SOP and shelter listing as reference rows
//! - `config init` - Write an annotated configuration file
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! saferoute serve
//!
//! # Route a household from the terminal
//! saferoute analyze --text "4 people, one bedridden, one cat" --location "Segamat, Johor"
//!
//! # Generate shell completions
//! saferoute completions bash > ~/.bash_completion.d/saferoute
//! ```

pub mod analyze;
pub mod completions;
pub mod config;
pub mod knowledge;
pub mod output;
pub mod serve;
pub mod table;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::SafeRouteConfig;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Default configuration file looked up by every command.
pub const DEFAULT_CONFIG_FILE: &str = "saferoute.toml";

/// SafeRoute - flood shelter routing over a hosted generative table
#[derive(Parser, Debug)]
#[command(
    name = "saferoute",
    version,
    about = "Emergency shelter routing orchestrator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve(ServeArgs),
    /// Submit a routing request and wait for the decision
    Analyze(AnalyzeArgs),
    /// Poll an existing row once
    Poll(PollArgs),
    /// Routing table setup
    #[command(subcommand)]
    Table(TableCommands),
    /// Reference knowledge utilities
    #[command(subcommand)]
    Knowledge(KnowledgeCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "SAFEROUTE_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "SAFEROUTE_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SAFEROUTE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Free-text description of the household and situation
    #[arg(short, long)]
    pub text: String,

    /// Location details (town, district, coordinates)
    #[arg(short, long)]
    pub location: Option<String>,

    /// Override the number of poll attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct PollArgs {
    /// Row id returned by a previous submission
    pub row_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum TableCommands {
    /// Create the routing table (succeeds if it already exists)
    Create(TableCreateArgs),
}

#[derive(Args, Debug)]
pub struct TableCreateArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum KnowledgeCommands {
    /// Insert the SOP summary and shelter listing into the routing table
    Upload(KnowledgeUploadArgs),
}

#[derive(Args, Debug)]
pub struct KnowledgeUploadArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load the config file if present, then apply environment overrides.
///
/// A missing file is not an error; defaults plus environment are used.
pub fn load_config(path: &Path) -> Result<SafeRouteConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        SafeRouteConfig::load(Some(path))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        SafeRouteConfig::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}
