use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier of a user or job as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A user, job or ranked user row. Only `id`, `name` and `status` are
/// interpreted; the full object rides along in `payload`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub status: Option<String>,
    pub payload: Map<String, Value>,
}

const ID_FIELDS: &[&str] = &["id", "_id"];
const NAME_FIELDS: &[&str] = &["name", "title", "fullName"];

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(id),
            name: name.into(),
            status: None,
            payload: Map::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Builds a record from a raw JSON object. Returns `None` when the
    /// value is not an object or carries no usable identifier.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(payload) = value else {
            return None;
        };
        let id = ID_FIELDS
            .iter()
            .find_map(|field| payload.get(*field).and_then(scalar_to_string))?;
        let name = NAME_FIELDS
            .iter()
            .find_map(|field| payload.get(*field).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();
        let status = payload
            .get("status")
            .and_then(scalar_to_string);
        Some(Self {
            id: RecordId(id),
            name,
            status,
            payload,
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListResult {
    pub items: Vec<Record>,
    pub reported_total: Option<u64>,
}

impl ListResult {
    pub fn new(items: Vec<Record>, reported_total: Option<u64>) -> Self {
        Self {
            items,
            reported_total,
        }
    }
}

/// Headline figures of the dashboard endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSnapshot {
    pub total_users: u64,
    pub total_jobs: u64,
    pub active_jobs: u64,
    pub ongoing_jobs: u64,
    pub total_transaction: u64,
    pub total_worker: u64,
    pub total_customers: u64,
    pub total_admin: u64,
}

impl DashboardSnapshot {
    /// Figures shown when the dashboard could not be loaded.
    pub fn placeholder() -> Self {
        Self::default()
    }
}

/// The two ranked lists shown on the stats tab.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeaderboardPair {
    pub top_workers: Vec<Record>,
    pub top_customers: Vec<Record>,
}

/// Successful outcome of a read fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourcePayload {
    Dashboard(DashboardSnapshot),
    List(ListResult),
    Leaderboards(LeaderboardPair),
}
