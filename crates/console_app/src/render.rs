use std::fmt::Write;

use console_core::{ChartSeries, ConsoleViewModel, DeletionStatus, RecordRow, Tab};

const BAR_WIDTH: u64 = 30;

pub fn render(view: &ConsoleViewModel) -> String {
    let mut out = String::new();
    let tabs: Vec<String> = Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == view.tab {
                format!("[{tab}]")
            } else {
                tab.to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "== {} ==", tabs.join(" | "));
    if view.loading {
        let _ = writeln!(out, "(loading)");
    }

    match view.tab {
        Tab::Overview => render_dashboard(&mut out, view),
        Tab::Users | Tab::Jobs => render_list(&mut out, view),
        Tab::Stats => render_stats(&mut out, view),
    }

    if let Some(deletion) = &view.deletion {
        let status = match deletion.status {
            DeletionStatus::Idle => "idle",
            DeletionStatus::Confirming => "confirm? (reason/confirm/cancel)",
            DeletionStatus::Submitting => "submitting...",
        };
        let _ = writeln!(
            out,
            "remove {} {}: {} reason=\"{}\"",
            deletion.kind, deletion.id, status, deletion.reason
        );
        if let Some(failure) = &deletion.failure {
            let _ = writeln!(out, "  ! {failure} (ack to dismiss)");
        }
    }
    if let Some(error) = &view.last_error {
        let _ = writeln!(out, "error: {error}");
    }
    out
}

fn render_dashboard(out: &mut String, view: &ConsoleViewModel) {
    let Some(dashboard) = &view.dashboard else {
        let _ = writeln!(out, "no figures yet");
        return;
    };
    let s = &dashboard.snapshot;
    if dashboard.placeholder {
        let _ = writeln!(out, "(figures unavailable)");
    }
    let _ = writeln!(
        out,
        "users {}  jobs {}  active {}  ongoing {}  transactions {}",
        s.total_users, s.total_jobs, s.active_jobs, s.ongoing_jobs, s.total_transaction
    );
    let _ = writeln!(
        out,
        "admins {}  workers {}  customers {}",
        s.total_admin, s.total_worker, s.total_customers
    );
}

fn render_list(out: &mut String, view: &ConsoleViewModel) {
    let total = view
        .reported_total
        .map(|total| format!(" of {total}"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "page {}/{} ({} per page{})  sort={}  filter=\"{}\"",
        view.page, view.total_pages, view.per_page, total, view.sort_key, view.filter
    );
    if view.rows.is_empty() {
        let _ = writeln!(out, "  (no rows)");
    }
    for row in &view.rows {
        render_row(out, row);
    }
}

fn render_row(out: &mut String, row: &RecordRow) {
    let status = row.status.as_deref().unwrap_or("-");
    let _ = writeln!(out, "  {:<26} {:<30} {}", row.id, row.name, status);
}

fn render_stats(out: &mut String, view: &ConsoleViewModel) {
    let poll = &view.poll;
    let last = poll
        .last_fetch_at
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    let _ = writeln!(
        out,
        "auto-refresh {} every {} ms, last fetch {}",
        if poll.enabled { "on" } else { "off" },
        poll.interval_ms,
        last
    );
    render_dashboard(out, view);
    for series in [&view.role_series, &view.job_series].into_iter().flatten() {
        render_series(out, series);
    }
    if let Some(boards) = &view.leaderboards {
        let _ = writeln!(out, "top workers:");
        boards.top_workers.iter().for_each(|row| render_row(out, row));
        let _ = writeln!(out, "top customers:");
        boards
            .top_customers
            .iter()
            .for_each(|row| render_row(out, row));
    }
}

fn render_series(out: &mut String, series: &ChartSeries) {
    let _ = writeln!(out, "{}:", series.label);
    let max = series
        .points
        .iter()
        .map(|point| point.value)
        .max()
        .unwrap_or(0)
        .max(1);
    for point in &series.points {
        let width = usize::try_from(point.value.saturating_mul(BAR_WIDTH) / max).unwrap_or(0);
        let _ = writeln!(
            out,
            "  {:<10} {:>6} {}",
            point.category,
            point.value,
            "#".repeat(width)
        );
    }
}
