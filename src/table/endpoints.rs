//! Candidate endpoint resolution.
//!
//! The hosted table service has exposed the same row operations under several
//! path layouts across API versions and deployments. Rather than guessing inline,
//! every caller asks the resolver for an ordered candidate list and walks it.

use crate::config::RemoteConfig;

/// Row operation a candidate list is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    /// Insert one routing row and trigger its derived columns.
    SubmitRow,
    /// Read back a single row by id.
    PollRow { row_id: &'a str },
    /// Insert reference rows (knowledge uploads).
    BulkInsert,
    /// Create the action table with its declared columns.
    CreateTable,
}

/// Body layout an endpoint expects for row insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{table_id, data: [...], completion_columns, stream, concurrent}`
    AddRows,
    /// `{rows: [...]}` for project-scoped table paths
    LegacyRows,
}

impl PayloadShape {
    pub fn for_url(url: &str) -> Self {
        if url.contains("/gen_tables/") || url.trim_end_matches('/').ends_with("/rows/add") {
            PayloadShape::AddRows
        } else {
            PayloadShape::LegacyRows
        }
    }
}

/// One concrete URL to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub shape: PayloadShape,
}

impl Endpoint {
    fn new(url: String) -> Self {
        let shape = PayloadShape::for_url(&url);
        Self {
            url,
            query: Vec::new(),
            shape,
        }
    }

    fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Pure function of configuration producing ordered endpoint candidates.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    root: String,
    project_id: String,
    table_id: String,
    table_type: String,
    override_url: Option<String>,
}

impl EndpointResolver {
    pub fn new(remote: &RemoteConfig) -> Self {
        Self {
            root: service_root(&remote.api_url),
            project_id: remote.project_id.trim().to_string(),
            table_id: remote.table_id.trim().to_string(),
            table_type: remote.table_type.trim().to_string(),
            override_url: remote
                .table_api_url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
        }
    }

    /// Ordered, de-duplicated candidates for `operation`.
    ///
    /// Empty without a base URL; the insertion override only takes precedence
    /// over the derived paths. `PollRow` expects an already validated row id.
    pub fn candidates(&self, operation: Operation<'_>) -> Vec<Endpoint> {
        let mut out: Vec<Endpoint> = Vec::new();
        if self.root.is_empty() {
            return out;
        }

        if matches!(operation, Operation::SubmitRow | Operation::BulkInsert) {
            if let Some(url) = &self.override_url {
                out.push(Endpoint::new(url.clone()));
            }
        }

        match operation {
            Operation::SubmitRow => self.insertion_paths(&mut out, false),
            Operation::BulkInsert => self.insertion_paths(&mut out, true),
            Operation::PollRow { row_id } => self.poll_paths(&mut out, row_id),
            Operation::CreateTable => self.table_paths(&mut out),
        }

        let mut seen = std::collections::HashSet::new();
        out.retain(|e| seen.insert((e.url.clone(), e.query.clone())));
        out
    }

    fn insertion_paths(&self, out: &mut Vec<Endpoint>, include_bare_table: bool) {
        let root = &self.root;
        let kind = &self.table_type;
        let table = &self.table_id;

        out.push(Endpoint::new(format!("{root}/api/v2/gen_tables/{kind}/rows/add")));
        out.push(Endpoint::new(format!("{root}/api/v1/gen_tables/{kind}/rows/add")));
        if !self.project_id.is_empty() {
            let project = &self.project_id;
            out.push(Endpoint::new(format!(
                "{root}/v1/projects/{project}/tables/{table}/rows"
            )));
            if include_bare_table {
                out.push(Endpoint::new(format!(
                    "{root}/v1/projects/{project}/tables/{table}"
                )));
            }
        }
        out.push(Endpoint::new(format!("{root}/v1/tables/{table}/rows")));
    }

    fn table_paths(&self, out: &mut Vec<Endpoint>) {
        let root = &self.root;
        let kind = &self.table_type;

        out.push(Endpoint::new(format!("{root}/api/v2/gen_tables/{kind}")));
        out.push(Endpoint::new(format!("{root}/api/v1/gen_tables/{kind}")));
        if !self.project_id.is_empty() {
            let project = &self.project_id;
            out.push(Endpoint::new(format!("{root}/v1/projects/{project}/tables")));
        }
    }

    fn poll_paths(&self, out: &mut Vec<Endpoint>, row_id: &str) {
        let root = &self.root;
        let kind = &self.table_type;
        let table = &self.table_id;

        out.push(
            Endpoint::new(format!("{root}/api/v2/gen_tables/{kind}/rows/{row_id}"))
                .with_query("table_id", table),
        );
        out.push(Endpoint::new(format!(
            "{root}/api/v1/gen_tables/{kind}/{table}/rows/{row_id}"
        )));
        if !self.project_id.is_empty() {
            let project = &self.project_id;
            out.push(Endpoint::new(format!(
                "{root}/v1/projects/{project}/tables/{table}/rows/{row_id}"
            )));
        }
    }
}

/// Strip trailing slashes and any version path from the configured base URL.
///
/// `https://api.example.com/v1/projects` and `https://api.example.com/` both
/// resolve to `https://api.example.com`.
fn service_root(api_url: &str) -> String {
    let trimmed = api_url.trim().trim_end_matches('/');
    let cut = ["/api/v", "/v1"]
        .iter()
        .filter_map(|marker| trimmed.find(marker))
        .min();
    let root = match cut {
        Some(i) => &trimmed[..i],
        None => trimmed,
    };
    root.trim_end_matches("/api").trim_end_matches('/').to_string()
}
