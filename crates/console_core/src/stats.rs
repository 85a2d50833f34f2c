use std::collections::BTreeMap;

use crate::DashboardSnapshot;

pub const ROLE_CATEGORIES: [&str; 3] = ["admins", "workers", "customers"];
pub const JOB_CATEGORIES: [&str; 3] = ["active", "ongoing", "pending"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub category: String,
    pub value: u64,
}

/// A fixed-order series for the chart renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn total(&self) -> u64 {
        self.points.iter().map(|point| point.value).sum()
    }
}

/// Lays `counts` out in `order`; categories without a count become zero and
/// counts outside `order` are ignored.
pub fn category_series(label: &str, order: &[&str], counts: &BTreeMap<String, u64>) -> ChartSeries {
    ChartSeries {
        label: label.to_string(),
        points: order
            .iter()
            .map(|category| SeriesPoint {
                category: (*category).to_string(),
                value: counts.get(*category).copied().unwrap_or(0),
            })
            .collect(),
    }
}

pub fn role_series(snapshot: &DashboardSnapshot) -> ChartSeries {
    let counts = BTreeMap::from([
        ("admins".to_string(), snapshot.total_admin),
        ("workers".to_string(), snapshot.total_worker),
        ("customers".to_string(), snapshot.total_customers),
    ]);
    category_series("users by role", &ROLE_CATEGORIES, &counts)
}

pub fn job_series(snapshot: &DashboardSnapshot) -> ChartSeries {
    let pending = snapshot
        .total_jobs
        .saturating_sub(snapshot.active_jobs.saturating_add(snapshot.ongoing_jobs));
    let counts = BTreeMap::from([
        ("active".to_string(), snapshot.active_jobs),
        ("ongoing".to_string(), snapshot.ongoing_jobs),
        ("pending".to_string(), pending),
    ]);
    category_series("jobs by state", &JOB_CATEGORIES, &counts)
}
