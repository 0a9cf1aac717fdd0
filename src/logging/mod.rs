//! Structured logging helpers
//!
//! Filter construction for the tracing subscriber, per-request correlation ids,
//! and privacy-safe field helpers for orchestration events.

pub mod fields;
pub mod middleware;

pub use fields::{outcome_label, preview_text};
pub use middleware::{generate_request_id, request_id_layer, REQUEST_ID_HEADER};

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
/// Components are sorted so the result is stable.
///
/// # Examples
///
/// ```
/// use saferoute::config::{LogFormat, LoggingConfig};
/// use saferoute::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("orchestrator".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Pretty,
///     component_levels: Some(component_levels),
///     enable_content_logging: false,
/// };
///
/// assert_eq!(build_filter_directives(&config), "info,saferoute::orchestrator=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",saferoute::{}={}", component, level));
        }
    }

    filter_str
}
