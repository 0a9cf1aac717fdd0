//! SafeRoute - flood shelter routing orchestrator
//!
//! This library submits emergency routing requests to a hosted generative
//! table, polls the row until both reasoning stages have run, and extracts
//! the selected relief centre from the model's free-text analysis.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod orchestrator;
pub mod table;
