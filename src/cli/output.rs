//! Output formatting helpers for CLI commands

use crate::orchestrator::{RouteResult, RouteStatus};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

/// View model for a routing outcome
#[derive(Debug, Clone, Serialize)]
pub struct RouteView {
    pub row_id: String,
    pub status: RouteStatus,
    pub selected_facility: String,
    pub tags: String,
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RouteView {
    pub fn from_result(row_id: &str, result: &RouteResult) -> Self {
        Self {
            row_id: row_id.to_string(),
            status: result.status(),
            selected_facility: result.selected_facility().to_string(),
            tags: result.decoded_tags().to_string(),
            analysis: result.analysis_text().to_string(),
            message: None,
        }
    }

    /// A row that has not completed yet, with a hint for the caller.
    pub fn still_processing(row_id: &str, message: impl Into<String>) -> Self {
        Self {
            row_id: row_id.to_string(),
            status: RouteStatus::Pending,
            selected_facility: String::new(),
            tags: String::new(),
            analysis: String::new(),
            message: Some(message.into()),
        }
    }
}

fn status_cell(status: RouteStatus) -> String {
    match status {
        RouteStatus::Complete => "Complete".green().to_string(),
        RouteStatus::Pending => "Pending".yellow().to_string(),
    }
}

/// Format a routing outcome as a two-column table
pub fn format_route_table(view: &RouteView) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    table.add_row(vec![Cell::new("Row ID"), Cell::new(&view.row_id)]);
    table.add_row(vec![Cell::new("Status"), Cell::new(status_cell(view.status))]);
    if !view.selected_facility.is_empty() {
        table.add_row(vec![
            Cell::new("Selected facility"),
            Cell::new(view.selected_facility.bold().to_string()),
        ]);
    }
    if !view.tags.is_empty() {
        table.add_row(vec![Cell::new("Decoded tags"), Cell::new(&view.tags)]);
    }
    if !view.analysis.is_empty() {
        table.add_row(vec![Cell::new("Analysis"), Cell::new(&view.analysis)]);
    }
    if let Some(message) = &view.message {
        table.add_row(vec![Cell::new("Note"), Cell::new(message)]);
    }

    table.to_string()
}

/// Format a routing outcome as JSON
pub fn format_route_json(view: &RouteView) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(view)
}
