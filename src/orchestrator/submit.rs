//! Row submission with candidate-endpoint fallback.

use super::prompts::{completion_columns, table_schema};
use super::types::{Job, RouteRequest};
use super::OrchestratorError;
use crate::config::{Credentials, KnowledgeConfig, RemoteConfig};
use crate::table::{normalize, EndpointResolver, Operation, PayloadShape, TableClient};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Row action written by `knowledge upload` for the SOP summary.
pub const SOP_UPLOAD_ACTION: &str = "sop_upload";
/// Row action written by `knowledge upload` for the shelter listing.
pub const SHELTER_UPLOAD_ACTION: &str = "shelter_upload";

/// Inserts routing rows and reference rows into the remote table.
///
/// Each candidate endpoint is tried once, in resolver order, until one answers
/// 2xx. That answer ends the walk: the row now exists remotely, so a body
/// without a row id is a failed submission and no other candidate is written to.
pub struct JobSubmitter {
    client: Arc<dyn TableClient>,
    resolver: EndpointResolver,
    remote: RemoteConfig,
    knowledge: KnowledgeConfig,
}

/// Result of a bulk insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkInsertOutcome {
    pub endpoint: String,
    pub rows: usize,
}

/// Result of table creation; `created` is false when the table already existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSetupOutcome {
    pub endpoint: String,
    pub created: bool,
}

/// Status the service answers when the table id is already taken.
const TABLE_EXISTS_STATUS: u16 = 409;

impl JobSubmitter {
    pub fn new(
        client: Arc<dyn TableClient>,
        remote: RemoteConfig,
        knowledge: KnowledgeConfig,
    ) -> Self {
        Self {
            client,
            resolver: EndpointResolver::new(&remote),
            remote,
            knowledge,
        }
    }

    /// Submit one routing request and return its job handle.
    ///
    /// Credentials are checked before the first request; a missing credential is
    /// a configuration error and no network call is made.
    pub async fn submit(&self, request: &RouteRequest) -> Result<Job, OrchestratorError> {
        let credentials = self.remote.credentials()?;

        let row = self.routing_row(request);
        let columns = completion_columns(request, &self.knowledge, &self.remote.model);

        let accepted = self
            .insert(Operation::SubmitRow, &credentials, vec![row], Some(&columns), true)
            .await?;
        let id = accepted.row_id.ok_or_else(|| OrchestratorError::Submission {
            tried_endpoints: vec![accepted.endpoint.clone()],
            last_status: Some(accepted.status),
        })?;

        info!(row_id = %id, endpoint = %accepted.endpoint, "Routing row submitted");
        Ok(Job::new(id))
    }

    /// Insert the SOP summary and shelter listing as reference rows.
    pub async fn upload_knowledge(&self) -> Result<BulkInsertOutcome, OrchestratorError> {
        let credentials = self.remote.credentials()?;
        let rows = self.knowledge_rows();
        let count = rows.len();

        let accepted = self
            .insert(Operation::BulkInsert, &credentials, rows, None, false)
            .await?;

        info!(endpoint = %accepted.endpoint, rows = count, "Knowledge rows uploaded");
        Ok(BulkInsertOutcome {
            endpoint: accepted.endpoint,
            rows: count,
        })
    }

    /// Create the routing table with its declared columns.
    ///
    /// A 409 from a candidate means the table exists and counts as success.
    pub async fn create_table(&self) -> Result<TableSetupOutcome, OrchestratorError> {
        let credentials = self.remote.credentials()?;
        let body = table_schema(&self.remote.table_id, &self.remote.model);

        let candidates = self.resolver.candidates(Operation::CreateTable);
        let mut tried = Vec::with_capacity(candidates.len());
        let mut last_status = None;

        for endpoint in candidates {
            tried.push(endpoint.url.clone());
            match self.client.post_json(&endpoint, &credentials, &body).await {
                Ok(_) => {
                    info!(table_id = %self.remote.table_id, endpoint = %endpoint.url, "Routing table created");
                    return Ok(TableSetupOutcome {
                        endpoint: endpoint.url,
                        created: true,
                    });
                }
                Err(e) if e.status() == Some(TABLE_EXISTS_STATUS) => {
                    info!(table_id = %self.remote.table_id, endpoint = %endpoint.url, "Routing table already exists");
                    return Ok(TableSetupOutcome {
                        endpoint: endpoint.url,
                        created: false,
                    });
                }
                Err(e) => {
                    debug!(endpoint = %endpoint.url, error = %e, "Create table attempt rejected");
                    last_status = e.status().or(last_status);
                }
            }
        }

        warn!(tried = tried.len(), last_status = ?last_status, "All create-table endpoints exhausted");
        Err(OrchestratorError::Submission {
            tried_endpoints: tried,
            last_status,
        })
    }

    fn routing_row(&self, request: &RouteRequest) -> Value {
        json!({
            "action": self.knowledge.action,
            "user_input": request.user_input(),
            "location_details": request.location_details(),
            "created_at": timestamp(),
        })
    }

    fn knowledge_rows(&self) -> Vec<Value> {
        let created_at = timestamp();
        vec![
            json!({
                "action": SOP_UPLOAD_ACTION,
                "title": "Flood SOP (summary)",
                "text": self.knowledge.sop,
                "source": "saferoute",
                "created_at": created_at,
            }),
            json!({
                "action": SHELTER_UPLOAD_ACTION,
                "title": "Relief centre listing",
                "text": self.knowledge.shelters,
                "source": "saferoute",
                "created_at": created_at,
            }),
        ]
    }

    fn payload(&self, shape: PayloadShape, rows: &[Value], columns: Option<&Value>) -> Value {
        let mut body = Map::new();
        match shape {
            PayloadShape::AddRows => {
                body.insert("table_id".into(), json!(self.remote.table_id));
                body.insert("data".into(), json!(rows));
                if let Some(columns) = columns {
                    body.insert("completion_columns".into(), columns.clone());
                }
                body.insert("stream".into(), json!(false));
                body.insert("concurrent".into(), json!(false));
            }
            PayloadShape::LegacyRows => {
                body.insert("rows".into(), json!(rows));
                if let Some(columns) = columns {
                    body.insert("completion_columns".into(), columns.clone());
                }
            }
        }
        Value::Object(body)
    }

    async fn insert(
        &self,
        operation: Operation<'_>,
        credentials: &Credentials,
        rows: Vec<Value>,
        columns: Option<&Value>,
        require_row_id: bool,
    ) -> Result<Accepted, OrchestratorError> {
        let candidates = self.resolver.candidates(operation);
        let mut tried = Vec::with_capacity(candidates.len());
        let mut last_status = None;

        for endpoint in candidates {
            let body = self.payload(endpoint.shape, &rows, columns);
            tried.push(endpoint.url.clone());

            match self.client.post_json(&endpoint, credentials, &body).await {
                Ok(response) => {
                    let row = normalize(&response.body);
                    let row_id = row.row_id().map(str::to_string);
                    if row_id.is_none() && require_row_id {
                        warn!(
                            endpoint = %endpoint.url,
                            status = response.status,
                            "Insert accepted but response carried no row id"
                        );
                        return Err(OrchestratorError::Submission {
                            tried_endpoints: tried,
                            last_status: Some(response.status),
                        });
                    }
                    return Ok(Accepted {
                        endpoint: endpoint.url,
                        status: response.status,
                        row_id,
                    });
                }
                Err(e) => {
                    debug!(endpoint = %endpoint.url, error = %e, "Insert attempt rejected");
                    last_status = e.status().or(last_status);
                }
            }
        }

        warn!(
            tried = tried.len(),
            last_status = ?last_status,
            "All insert endpoints exhausted"
        );
        Err(OrchestratorError::Submission {
            tried_endpoints: tried,
            last_status,
        })
    }
}

struct Accepted {
    endpoint: String,
    status: u16,
    row_id: Option<String>,
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
