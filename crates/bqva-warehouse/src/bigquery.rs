//! BigQuery v2 REST backend
//!
//! Resolution uses `tables.get`; access lists are read with `datasets.get`
//! and written with a `datasets.patch` carrying only the `access` field.
//! The dataset etag seen by the last read is sent as `If-Match` on the
//! following write, so a concurrent change surfaces as a conflict instead of
//! being overwritten.

use crate::error::{WarehouseError, WarehouseResult};
use crate::traits::{AccessControlGateway, MetadataResolver};
use async_trait::async_trait;
use bqva_core::{AccessEntity, AccessEntry, CatalogObject, DatasetRef, ObjectRef, QueryDialect};
use reqwest::header::IF_MATCH;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

/// Token variable consulted when the configured one is unset.
pub const FALLBACK_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Async client for the BigQuery REST API.
pub struct BigQueryClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    etags: Mutex<HashMap<DatasetRef, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableReference {
    project_id: String,
    dataset_id: String,
    table_id: String,
}

impl TableReference {
    fn to_object(&self) -> WarehouseResult<ObjectRef> {
        Ok(ObjectRef::from_parts(
            &self.project_id,
            &self.dataset_id,
            &self.table_id,
        )?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewDefinition {
    query: String,
    use_legacy_sql: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableResource {
    table_reference: TableReference,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    view: Option<ViewDefinition>,
}

#[derive(Debug, Deserialize)]
struct DatasetResource {
    etag: Option<String>,
    #[serde(default)]
    access: Vec<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
struct AccessPatch {
    access: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl BigQueryClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> WarehouseResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
            etags: Mutex::new(HashMap::new()),
        })
    }

    /// Build a client whose bearer token is read from `token_env`, falling
    /// back to [`FALLBACK_TOKEN_ENV`].
    pub fn from_env(endpoint: &str, token_env: &str, timeout: Duration) -> WarehouseResult<Self> {
        let token = [token_env, FALLBACK_TOKEN_ENV]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or_else(|| {
                WarehouseError::PermissionDenied(format!(
                    "no access token found in ${} or ${}",
                    token_env, FALLBACK_TOKEN_ENV
                ))
            })?;
        Self::new(endpoint, token, timeout)
    }

    fn dataset_url(&self, dataset: &DatasetRef) -> String {
        format!(
            "{}/projects/{}/datasets/{}",
            self.endpoint, dataset.project, dataset.dataset
        )
    }

    fn table_url(&self, reference: &ObjectRef) -> String {
        format!(
            "{}/tables/{}",
            self.dataset_url(&reference.dataset_ref()),
            reference.table
        )
    }

    /// Turn a non-success response into the matching error.
    async fn check(response: reqwest::Response, what: &str) -> WarehouseResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, what, &body))
    }
}

/// Map an HTTP failure onto the warehouse error taxonomy.
fn classify_status(status: StatusCode, what: &str, body: &str) -> WarehouseError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let detail = if message.is_empty() {
        what.to_string()
    } else {
        format!("{}: {}", what, message)
    };

    match status {
        StatusCode::NOT_FOUND => WarehouseError::NotFound(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WarehouseError::PermissionDenied(detail),
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => WarehouseError::Conflict(detail),
        other => WarehouseError::Api {
            status: other.as_u16(),
            message: detail,
        },
    }
}

fn catalog_object(resource: TableResource) -> WarehouseResult<CatalogObject> {
    let reference = resource.table_reference.to_object()?;
    match (resource.kind.as_deref(), resource.view) {
        (Some("VIEW"), Some(view)) => {
            let dialect = if view.use_legacy_sql.unwrap_or(true) {
                QueryDialect::Legacy
            } else {
                QueryDialect::Standard
            };
            Ok(CatalogObject::view(reference, view.query, dialect))
        }
        (Some("VIEW"), None) => Err(WarehouseError::InvalidResponse(format!(
            "view {} has no definition",
            reference
        ))),
        _ => Ok(CatalogObject::table(reference)),
    }
}

/// Access entry fields that qualify a grant rather than name its grantee.
const ENTRY_ATTRIBUTES: &[&str] = &["condition"];

/// Convert one API access entry. The entry holds an optional `role`, exactly
/// one grantee field such as `view` or `userByEmail`, and optional
/// [`ENTRY_ATTRIBUTES`], which are carried through untouched.
fn entry_from_json(mut raw: Map<String, Value>) -> WarehouseResult<AccessEntry> {
    let role = match raw.remove("role") {
        None | Some(Value::Null) => None,
        Some(Value::String(role)) => Some(role),
        Some(other) => {
            return Err(WarehouseError::InvalidResponse(format!(
                "access entry role is not a string: {}",
                other
            )))
        }
    };

    let mut extra = Map::new();
    for attribute in ENTRY_ATTRIBUTES {
        if let Some(value) = raw.remove(*attribute) {
            extra.insert(attribute.to_string(), value);
        }
    }

    let mut grantees = raw.into_iter();
    let (entity_type, entity_id) = grantees.next().ok_or_else(|| {
        WarehouseError::InvalidResponse("access entry names no grantee".to_string())
    })?;
    if grantees.next().is_some() {
        return Err(WarehouseError::InvalidResponse(
            "access entry names more than one grantee".to_string(),
        ));
    }

    let entity = if entity_type == "view" {
        let view: TableReference = serde_json::from_value(entity_id)
            .map_err(|e| WarehouseError::InvalidResponse(format!("authorized view: {}", e)))?;
        AccessEntity::View(view.to_object()?)
    } else {
        AccessEntity::Member {
            entity_type,
            entity_id,
        }
    };
    Ok(AccessEntry {
        role,
        entity,
        extra,
    })
}

fn entry_to_json(entry: &AccessEntry) -> Map<String, Value> {
    let mut raw = Map::new();
    if let Some(role) = &entry.role {
        raw.insert("role".to_string(), Value::String(role.clone()));
    }
    match &entry.entity {
        AccessEntity::View(view) => {
            raw.insert(
                "view".to_string(),
                json!({
                    "projectId": view.project.as_str(),
                    "datasetId": view.dataset.as_str(),
                    "tableId": view.table.as_str(),
                }),
            );
        }
        AccessEntity::Member {
            entity_type,
            entity_id,
        } => {
            raw.insert(entity_type.clone(), entity_id.clone());
        }
    }
    for (key, value) in &entry.extra {
        raw.insert(key.clone(), value.clone());
    }
    raw
}

#[async_trait]
impl MetadataResolver for BigQueryClient {
    async fn resolve(&self, reference: &ObjectRef) -> WarehouseResult<CatalogObject> {
        log::debug!("tables.get {}", reference);
        let response = self
            .http
            .get(self.table_url(reference))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::check(response, &format!("object {}", reference)).await?;
        let resource: TableResource = response
            .json()
            .await
            .map_err(|e| WarehouseError::InvalidResponse(format!("table {}: {}", reference, e)))?;
        catalog_object(resource)
    }
}

#[async_trait]
impl AccessControlGateway for BigQueryClient {
    async fn get_access_list(&self, dataset: &DatasetRef) -> WarehouseResult<Vec<AccessEntry>> {
        log::debug!("datasets.get {}", dataset);
        let response = self
            .http
            .get(self.dataset_url(dataset))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::check(response, &format!("dataset {}", dataset)).await?;
        let resource: DatasetResource = response
            .json()
            .await
            .map_err(|e| WarehouseError::InvalidResponse(format!("dataset {}: {}", dataset, e)))?;

        if let Some(etag) = resource.etag {
            self.etags.lock().await.insert(dataset.clone(), etag);
        }
        resource.access.into_iter().map(entry_from_json).collect()
    }

    async fn set_access_list(
        &self,
        dataset: &DatasetRef,
        entries: Vec<AccessEntry>,
    ) -> WarehouseResult<()> {
        log::debug!("datasets.patch {} ({} entries)", dataset, entries.len());
        let body = AccessPatch {
            access: entries.iter().map(entry_to_json).collect(),
        };

        let mut request = self
            .http
            .patch(self.dataset_url(dataset))
            .bearer_auth(&self.token)
            .json(&body);
        if let Some(etag) = self.etags.lock().await.remove(dataset) {
            request = request.header(IF_MATCH, etag);
        }

        let response = request.send().await?;
        let response = Self::check(response, &format!("dataset {}", dataset)).await?;
        let resource: DatasetResource = response
            .json()
            .await
            .map_err(|e| WarehouseError::InvalidResponse(format!("dataset {}: {}", dataset, e)))?;
        if let Some(etag) = resource.etag {
            self.etags.lock().await.insert(dataset.clone(), etag);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "bigquery"
    }
}

#[cfg(test)]
#[path = "bigquery_test.rs"]
mod tests;
