//! Remote generative-table access.
//!
//! Three concerns live here, each independent of routing semantics:
//!
//! - [`endpoints`]: ordered candidate URLs for an operation, derived from config
//! - [`client`]: one-request-per-call HTTP transport behind the [`TableClient`] trait
//! - [`row`]: normalization of every known response shape into a [`Row`]

pub mod client;
pub mod endpoints;
pub mod error;
pub mod row;

pub use client::{HttpTableClient, TableClient, TableResponse};
pub use endpoints::{Endpoint, EndpointResolver, Operation, PayloadShape};
pub use error::{ErrorClass, TableError};
pub use row::{normalize, Cell, RawResponse, Row};

/// Derived column holding the decoded situation tags.
pub const DECODED_TAGS_COLUMN: &str = "decoded_tags";
/// Derived column holding the routing analysis text.
pub const ROUTE_ANALYSIS_COLUMN: &str = "route_analysis";
/// Optional column some table configurations fill with the chosen facility.
pub const SELECTED_FACILITY_COLUMN: &str = "selected_pps";
