//! Hosted record store repository.
//!
//! Tasks live in a table of a hosted backend reached over HTTP. Records
//! come back in the store's own shape (`Id`, `CreatedOn`, free-form status
//! strings) and are normalised into [`Task`] before the dashboard sees them.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::config::RemoteConfig;
use crate::db::parse_due_input;
use crate::fields::{Priority, Status};
use crate::repository::{RepositoryError, RepositoryResult, TaskFilter, TaskRepository};
use crate::task::{NewTask, Task};

const FIELDS: [&str; 7] = [
    "Id",
    "title",
    "description",
    "status",
    "priority",
    "dueDate",
    "CreatedOn",
];

/// HTTP client for one task table of the hosted store.
#[derive(Debug, Clone)]
pub struct RemoteRepository {
    client: Client,
    base_url: String,
    table: String,
    project_id: String,
    public_key: String,
    timeout: Duration,
}

/// A record as the store returns it.
#[derive(Debug, Default, Deserialize)]
pub struct Record {
    #[serde(rename = "Id")]
    pub id: Option<Value>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    #[serde(rename = "CreatedOn")]
    pub created_on: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    data: Option<Vec<Record>>,
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Record>,
}

impl RemoteRepository {
    pub fn new(config: &RemoteConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots).
    pub fn with_client(config: &RemoteConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            project_id: config.project_id.clone().unwrap_or_default(),
            public_key: config.public_key.clone().unwrap_or_default(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn url(&self, action: &str) -> String {
        format!("{}/tables/{}/{}", self.base_url, self.table, action)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> RepositoryResult<T> {
        let response = request
            .header("X-Project-Id", &self.project_id)
            .header("X-Public-Key", &self.public_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RepositoryError::Transport(format!("timed out after {}s", self.timeout.as_secs()))
                } else {
                    RepositoryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(RepositoryError::Rejected(format!("HTTP {status}")));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn mutate(&self, request: RequestBuilder) -> RepositoryResult<MutationResponse> {
        let response: MutationResponse = self.send(request).await?;
        if response.success == Some(false) {
            let message = response
                .message
                .clone()
                .unwrap_or_else(|| "request was not accepted".into());
            return Err(RepositoryError::Rejected(message));
        }
        Ok(response)
    }
}

impl TaskRepository for RemoteRepository {
    async fn list(&self, filter: &TaskFilter) -> RepositoryResult<Vec<Task>> {
        debug!(table = %self.table, ?filter, "fetching remote tasks");
        let request = self.client.post(self.url("fetch")).json(&fetch_params(filter));
        let response: FetchResponse = self.send(request).await.inspect_err(|e| {
            error!(error = %e, "error fetching tasks");
        })?;

        let today = Local::now().date_naive();
        let now = Utc::now();
        let tasks = response
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|record| {
                let task = normalize_record(record, today, now);
                if task.is_none() {
                    warn!("dropping task record without an Id");
                }
                task
            });
        Ok(filter.apply(tasks))
    }

    async fn create(&self, task: NewTask) -> RepositoryResult<Task> {
        let body = json!({ "records": [create_record(&task)] });
        let request = self.client.post(self.url("records")).json(&body);
        let response = self.mutate(request).await.inspect_err(|e| {
            error!(error = %e, "error creating task");
        })?;

        let result = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::Rejected("failed to create task".into()))?;
        if result.success == Some(false) {
            return Err(RepositoryError::Rejected(
                result.message.unwrap_or_else(|| "failed to create task".into()),
            ));
        }
        let record = result
            .data
            .ok_or_else(|| RepositoryError::Rejected("failed to create task".into()))?;
        normalize_record(record, task.due_date, Utc::now())
            .ok_or_else(|| RepositoryError::Rejected("created record has no Id".into()))
    }

    async fn set_status(&self, id: &str, status: Status) -> RepositoryResult<()> {
        let body = json!({ "records": [{ "Id": record_id(id)?, "status": status.as_str() }] });
        let request = self.client.put(self.url("records")).json(&body);
        self.mutate(request).await.inspect_err(|e| {
            error!(id, error = %e, "error updating task status");
        })?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let body = json!({ "RecordIds": [record_id(id)?] });
        let request = self.client.delete(self.url("records")).json(&body);
        self.mutate(request).await.inspect_err(|e| {
            error!(id, error = %e, "error deleting task");
        })?;
        Ok(())
    }
}

/// Query body for a fetch: every task field, due date ascending, optional
/// exact-match conditions.
pub fn fetch_params(filter: &TaskFilter) -> Value {
    let mut conditions = Vec::new();
    if let Some(status) = filter.status {
        conditions.push(json!({
            "fieldName": "status",
            "operator": "ExactMatch",
            "values": [status.as_str()],
        }));
    }
    if let Some(priority) = filter.priority {
        conditions.push(json!({
            "fieldName": "priority",
            "operator": "ExactMatch",
            "values": [priority.as_str()],
        }));
    }
    json!({
        "fields": FIELDS,
        "orderBy": [{ "field": "dueDate", "direction": "ASC" }],
        "where": conditions,
    })
}

fn create_record(task: &NewTask) -> Value {
    json!({
        "title": task.title,
        "description": task.description,
        "status": task.status.as_str(),
        "priority": task.priority.as_str(),
        "dueDate": task.due_date.format("%Y-%m-%d").to_string(),
    })
}

/// The store keys records by integer.
fn record_id(id: &str) -> RepositoryResult<i64> {
    id.trim()
        .parse()
        .map_err(|_| RepositoryError::Rejected(format!("invalid record id '{id}'")))
}

/// Turn a store record into a task.
///
/// Missing or unrecognised values fall back to the form defaults: empty
/// text, "Not Started", "Medium", due `today`, created `now`. Returns `None`
/// when the record has no usable `Id`.
pub fn normalize_record(record: Record, today: NaiveDate, now: DateTime<Utc>) -> Option<Task> {
    let id = match record.id? {
        Value::Number(n) => n.to_string(),
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return None,
    };
    let due_date = record
        .due_date
        .as_deref()
        .and_then(|d| parse_due_input(d, today))
        .unwrap_or(today);
    let created_at = record
        .created_on
        .as_deref()
        .and_then(|c| DateTime::parse_from_rfc3339(c).ok())
        .map(|c| c.with_timezone(&Utc))
        .unwrap_or(now);
    Some(Task {
        id,
        title: record.title.unwrap_or_default(),
        description: record.description.unwrap_or_default(),
        status: record
            .status
            .as_deref()
            .and_then(Status::parse)
            .unwrap_or_default(),
        priority: record
            .priority
            .as_deref()
            .and_then(Priority::parse)
            .unwrap_or_default(),
        due_date,
        created_at,
    })
}
