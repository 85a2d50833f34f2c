use chrono::{DateTime, Utc};

use crate::deletion::PendingDeletion;
use crate::{
    ChartSeries, DashboardSnapshot, DeletionStatus, LeaderboardPair, Record, RecordId, Tab,
    TargetKind,
};

/// Read-only projection of the console for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleViewModel {
    pub tab: Tab,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
    pub reported_total: Option<u64>,
    pub sort_key: String,
    pub filter: String,
    /// Rows of the users or jobs tab; empty elsewhere.
    pub rows: Vec<RecordRow>,
    pub dashboard: Option<DashboardView>,
    pub role_series: Option<ChartSeries>,
    pub job_series: Option<ChartSeries>,
    pub leaderboards: Option<LeaderboardView>,
    pub poll: PollView,
    pub deletion: Option<DeletionView>,
    pub loading: bool,
    pub last_error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub id: RecordId,
    pub name: String,
    pub status: Option<String>,
}

impl From<&Record> for RecordRow {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            status: record.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardView {
    pub snapshot: DashboardSnapshot,
    /// Set when the figures are the fallback shown after a failed fetch.
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardView {
    pub top_workers: Vec<RecordRow>,
    pub top_customers: Vec<RecordRow>,
}

impl From<&LeaderboardPair> for LeaderboardView {
    fn from(pair: &LeaderboardPair) -> Self {
        Self {
            top_workers: pair.top_workers.iter().map(RecordRow::from).collect(),
            top_customers: pair.top_customers.iter().map(RecordRow::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollView {
    pub enabled: bool,
    pub armed: bool,
    pub interval_ms: u64,
    pub last_fetch_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionView {
    pub kind: TargetKind,
    pub id: RecordId,
    pub reason: String,
    pub status: DeletionStatus,
    pub failure: Option<String>,
}

impl From<&PendingDeletion> for DeletionView {
    fn from(pending: &PendingDeletion) -> Self {
        Self {
            kind: pending.target.kind,
            id: pending.target.id.clone(),
            reason: pending.reason_message.clone(),
            status: pending.status,
            failure: pending.failure.clone(),
        }
    }
}
