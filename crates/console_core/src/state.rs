use chrono::{DateTime, Utc};
use console_logging::{console_debug, console_info, console_warn};
use serde::{Deserialize, Serialize};

use crate::deletion::{DeletionFlow, Resolution};
use crate::filter_sort::FilterSort;
use crate::pagination::Pagination;
use crate::polling::{PollId, PollState};
use crate::request::RequestTracker;
use crate::view_model::{
    ConsoleViewModel, DashboardView, DeletionView, LeaderboardView, PollView, RecordRow,
};
use crate::{
    job_series, role_series, ConsoleError, DashboardSnapshot, DeletionTarget, Effect,
    LeaderboardPair, PageRequest, Record, RequestId, ResourcePayload, ResourceRequest,
    ResourceSlot, Tab, TargetKind,
};

/// Tunables of the console. Loaded by the host from its config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    pub per_page: u32,
    pub default_sort: String,
    /// Quiet period before a filter edit is fetched; 0 fetches on every edit.
    pub filter_debounce_ms: u64,
    pub poll_interval_ms: u64,
    pub auto_refresh: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            per_page: 10,
            default_sort: "newest".to_string(),
            filter_debounce_ms: 300,
            poll_interval_ms: 5_000,
            auto_refresh: true,
        }
    }
}

/// Everything the admin console knows. Only `update` mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleState {
    settings: ConsoleSettings,
    tab: Tab,
    pagination: Pagination,
    filter_sort: FilterSort,
    requests: RequestTracker,
    users: Vec<Record>,
    jobs: Vec<Record>,
    dashboard: Option<DashboardSnapshot>,
    dashboard_is_placeholder: bool,
    leaderboards: Option<LeaderboardPair>,
    poll: PollState,
    deletion: DeletionFlow,
    last_error: Option<ConsoleError>,
    dirty: bool,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::with_settings(ConsoleSettings::default())
    }

    pub fn with_settings(settings: ConsoleSettings) -> Self {
        Self {
            tab: Tab::default(),
            pagination: Pagination::new(settings.per_page),
            filter_sort: FilterSort::new(settings.default_sort.clone()),
            requests: RequestTracker::default(),
            users: Vec::new(),
            jobs: Vec::new(),
            dashboard: None,
            dashboard_is_placeholder: false,
            leaderboards: None,
            poll: PollState::new(settings.auto_refresh, settings.poll_interval_ms),
            deletion: DeletionFlow::default(),
            last_error: None,
            dirty: false,
            settings,
        }
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Fingerprint the list tabs would fetch right now.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.pagination.page(),
            per_page: self.pagination.per_page(),
            sort_key: self.filter_sort.sort_key().to_string(),
            filter: self.filter_sort.query_filter(),
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> ConsoleViewModel {
        let rows = self
            .displayed_list()
            .map(|list| list.iter().map(RecordRow::from).collect())
            .unwrap_or_default();
        let dashboard = self
            .dashboard
            .filter(|_| self.tab.shows(ResourceSlot::Dashboard))
            .map(|snapshot| DashboardView {
                snapshot,
                placeholder: self.dashboard_is_placeholder,
            });
        let (role_series, job_series) = match (self.tab, dashboard.as_ref()) {
            (Tab::Stats, Some(view)) => (
                Some(role_series(&view.snapshot)),
                Some(job_series(&view.snapshot)),
            ),
            _ => (None, None),
        };
        let leaderboards = self
            .leaderboards
            .as_ref()
            .filter(|_| self.tab.shows(ResourceSlot::Leaderboards))
            .map(LeaderboardView::from);

        ConsoleViewModel {
            tab: self.tab,
            page: self.pagination.page(),
            per_page: self.pagination.per_page(),
            total_pages: self.pagination.total_pages(),
            reported_total: self.pagination.reported_total(),
            sort_key: self.filter_sort.sort_key().to_string(),
            filter: self.filter_sort.filter().to_string(),
            rows,
            dashboard,
            role_series,
            job_series,
            leaderboards,
            poll: PollView {
                enabled: self.poll.enabled(),
                armed: self.poll.armed().is_some(),
                interval_ms: self.poll.interval_ms(),
                last_fetch_at: self.poll.last_fetch_at(),
            },
            deletion: self.deletion.pending().map(DeletionView::from),
            loading: self
                .tab
                .slots()
                .iter()
                .any(|slot| self.requests.is_loading(*slot)),
            last_error: self.last_error.as_ref().map(ToString::to_string),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn displayed_list(&self) -> Option<&Vec<Record>> {
        match self.tab.list_kind()? {
            TargetKind::User => Some(&self.users),
            TargetKind::Job => Some(&self.jobs),
        }
    }

    fn list_mut(&mut self, kind: TargetKind) -> &mut Vec<Record> {
        match kind {
            TargetKind::User => &mut self.users,
            TargetKind::Job => &mut self.jobs,
        }
    }

    /// What this console would fetch for `slot` right now, if the active tab shows it.
    fn live_resource(&self, slot: ResourceSlot) -> Option<ResourceRequest> {
        if !self.tab.shows(slot) {
            return None;
        }
        Some(match slot {
            ResourceSlot::Dashboard => ResourceRequest::Dashboard,
            ResourceSlot::Users => ResourceRequest::Users(self.page_request()),
            ResourceSlot::Jobs => ResourceRequest::Jobs(self.page_request()),
            ResourceSlot::Leaderboards => ResourceRequest::Leaderboards,
        })
    }

    fn polls_dashboard(&self) -> bool {
        self.tab == Tab::Stats && self.poll.enabled()
    }

    fn issue(&mut self, resource: ResourceRequest, effects: &mut Vec<Effect>) {
        for request_id in self.requests.supersede(&resource) {
            console_debug!("superseding request {}", request_id);
            effects.push(Effect::AbortFetch { request_id });
        }
        let request_id = self.requests.issue(resource.clone());
        console_debug!("issuing request {} for {:?}", request_id, resource);
        effects.push(Effect::Fetch {
            request_id,
            resource,
        });
    }

    fn arm_poll(&mut self, effects: &mut Vec<Effect>) {
        let poll_id = self.poll.arm();
        console_info!(
            "arming dashboard poll {} every {} ms",
            poll_id,
            self.poll.interval_ms()
        );
        effects.push(Effect::ArmPolling {
            poll_id,
            interval_ms: self.poll.interval_ms(),
        });
    }

    fn disarm_poll(&mut self, effects: &mut Vec<Effect>) {
        if self.poll.disarm() {
            console_info!("disarming dashboard poll");
            effects.push(Effect::DisarmPolling);
        }
    }

    /// Pull-based refetch: compares the live fingerprint of every slot the
    /// active tab shows with the last one requested and issues what differs.
    pub(crate) fn sync_fetches(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        for slot in self.tab.slots() {
            if *slot == ResourceSlot::Dashboard && self.polls_dashboard() {
                if self.poll.armed().is_none() {
                    self.arm_poll(&mut effects);
                }
                continue;
            }
            if matches!(slot, ResourceSlot::Users | ResourceSlot::Jobs)
                && self.filter_sort.debounce_pending()
            {
                continue;
            }
            let Some(live) = self.live_resource(*slot) else {
                continue;
            };
            if self.requests.last_requested(*slot) != Some(&live) {
                self.issue(live, &mut effects);
            }
        }
        effects
    }

    pub(crate) fn start(&mut self) -> Vec<Effect> {
        console_info!("console started on tab {}", self.tab);
        self.mark_dirty();
        self.sync_fetches()
    }

    pub(crate) fn select_tab(&mut self, tab: Tab) -> Vec<Effect> {
        if tab == self.tab {
            return Vec::new();
        }
        console_info!("tab {} -> {}", self.tab, tab);
        let mut effects = Vec::new();
        for request_id in self.requests.cancel_all() {
            effects.push(Effect::AbortFetch { request_id });
        }
        self.disarm_poll(&mut effects);
        if self.deletion.status() == crate::DeletionStatus::Confirming {
            self.deletion.cancel();
        }

        self.tab = tab;
        self.pagination.reset();
        self.filter_sort.clear_filter();
        self.users.clear();
        self.jobs.clear();
        self.last_error = None;
        self.mark_dirty();

        effects.extend(self.sync_fetches());
        effects
    }

    pub(crate) fn refresh(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.filter_sort.flush();
        for slot in self.tab.slots() {
            self.requests.forget_requested(*slot);
        }
        if self.poll.armed().is_some() {
            self.arm_poll(&mut effects);
        }
        effects.extend(self.sync_fetches());
        self.mark_dirty();
        effects
    }

    pub(crate) fn next_page(&mut self) -> Vec<Effect> {
        if self.tab.list_kind().is_none() {
            return Vec::new();
        }
        self.filter_sort.flush();
        if !self.pagination.next_page() {
            console_debug!("next page refused at page {}", self.pagination.page());
            return Vec::new();
        }
        self.mark_dirty();
        self.sync_fetches()
    }

    pub(crate) fn prev_page(&mut self) -> Vec<Effect> {
        if self.tab.list_kind().is_none() {
            return Vec::new();
        }
        self.filter_sort.flush();
        if !self.pagination.prev_page() {
            return Vec::new();
        }
        self.mark_dirty();
        self.sync_fetches()
    }

    pub(crate) fn set_per_page(&mut self, per_page: u32) -> Vec<Effect> {
        if !self.pagination.set_per_page(per_page) {
            return Vec::new();
        }
        self.filter_sort.flush();
        self.mark_dirty();
        self.sync_fetches()
    }

    pub(crate) fn set_filter(&mut self, text: String) -> Vec<Effect> {
        self.pagination.first_page();
        let generation = self.filter_sort.set_filter(text);
        self.mark_dirty();
        let mut effects = Vec::new();
        if self.settings.filter_debounce_ms == 0 {
            self.filter_sort.flush();
        } else {
            effects.push(Effect::ScheduleDebounce {
                generation,
                delay_ms: self.settings.filter_debounce_ms,
            });
        }
        effects.extend(self.sync_fetches());
        effects
    }

    pub(crate) fn filter_debounce_elapsed(&mut self, generation: u64) -> Vec<Effect> {
        if !self.filter_sort.debounce_elapsed(generation) {
            console_debug!("ignoring superseded filter debounce {}", generation);
            return Vec::new();
        }
        self.sync_fetches()
    }

    pub(crate) fn set_sort(&mut self, key: String) -> Vec<Effect> {
        self.filter_sort.set_sort(key);
        self.pagination.first_page();
        self.mark_dirty();
        self.sync_fetches()
    }

    pub(crate) fn set_auto_refresh(&mut self, enabled: bool) -> Vec<Effect> {
        if !self.poll.set_enabled(enabled) {
            return Vec::new();
        }
        self.mark_dirty();
        let mut effects = Vec::new();
        if !enabled {
            self.disarm_poll(&mut effects);
        }
        effects.extend(self.sync_fetches());
        effects
    }

    pub(crate) fn set_poll_interval(&mut self, interval_ms: u64) -> Vec<Effect> {
        if !self.poll.set_interval(interval_ms) {
            return Vec::new();
        }
        self.mark_dirty();
        let mut effects = Vec::new();
        if self.poll.armed().is_some() {
            self.arm_poll(&mut effects);
        }
        effects
    }

    pub(crate) fn poll_tick(&mut self, poll_id: PollId, at: DateTime<Utc>) -> Vec<Effect> {
        if !self.poll.accept_tick(poll_id, at) {
            console_debug!("ignoring tick of disarmed poll {}", poll_id);
            return Vec::new();
        }
        self.mark_dirty();
        let mut effects = Vec::new();
        self.issue(ResourceRequest::Dashboard, &mut effects);
        effects
    }

    pub(crate) fn apply_fetch(
        &mut self,
        request_id: RequestId,
        result: Result<ResourcePayload, ConsoleError>,
    ) {
        let live = self
            .requests
            .slot_of(request_id)
            .and_then(|slot| self.live_resource(slot));
        let resource = match self.requests.resolve(request_id, live.as_ref()) {
            Ok(resource) => resource,
            Err(stale) => {
                console_debug!("discarding result: {}", stale);
                return;
            }
        };
        self.mark_dirty();

        let slot = resource.slot();
        match (slot, result) {
            (ResourceSlot::Users | ResourceSlot::Jobs, Ok(ResourcePayload::List(list))) => {
                console_debug!(
                    "request {} loaded {} rows (total {:?})",
                    request_id,
                    list.items.len(),
                    list.reported_total
                );
                self.pagination
                    .apply_result(list.reported_total, list.items.len());
                let kind = match slot {
                    ResourceSlot::Users => TargetKind::User,
                    _ => TargetKind::Job,
                };
                *self.list_mut(kind) = list.items;
                self.last_error = None;
            }
            (ResourceSlot::Dashboard, Ok(ResourcePayload::Dashboard(snapshot))) => {
                self.dashboard = Some(snapshot);
                self.dashboard_is_placeholder = false;
                self.last_error = None;
            }
            (ResourceSlot::Leaderboards, Ok(ResourcePayload::Leaderboards(pair))) => {
                self.leaderboards = Some(pair);
                self.last_error = None;
            }
            (slot, Ok(_)) => {
                self.fall_back(
                    slot,
                    ConsoleError::server(200, "unexpected payload for resource"),
                );
            }
            (slot, Err(err)) => self.fall_back(slot, err),
        }
    }

    fn fall_back(&mut self, slot: ResourceSlot, err: ConsoleError) {
        console_warn!("{:?} fetch failed, using fallback: {}", slot, err);
        match slot {
            ResourceSlot::Users => {
                self.users.clear();
                self.pagination.clear_result();
            }
            ResourceSlot::Jobs => {
                self.jobs.clear();
                self.pagination.clear_result();
            }
            ResourceSlot::Dashboard => {
                self.dashboard = Some(DashboardSnapshot::placeholder());
                self.dashboard_is_placeholder = true;
            }
            ResourceSlot::Leaderboards => {
                self.leaderboards = Some(LeaderboardPair::default());
            }
        }
        self.last_error = Some(err);
    }

    pub(crate) fn request_deletion(&mut self, target: DeletionTarget) {
        if self.tab.list_kind() != Some(target.kind) {
            console_warn!(
                "cannot delete {} {} from the {} tab",
                target.kind,
                target.id,
                self.tab
            );
            return;
        }
        let listed = self
            .displayed_list()
            .is_some_and(|list| list.iter().any(|record| record.id == target.id));
        if !listed {
            console_warn!("{} {} is not in the displayed list", target.kind, target.id);
            return;
        }
        match self.deletion.select_target(target) {
            Ok(()) => self.mark_dirty(),
            Err(err) => console_warn!("deletion rejected: {}", err),
        }
    }

    pub(crate) fn set_deletion_reason(&mut self, text: String) {
        if self.deletion.set_reason(text) {
            self.mark_dirty();
        }
    }

    pub(crate) fn cancel_deletion(&mut self) {
        if self.deletion.cancel() {
            self.mark_dirty();
        }
    }

    pub(crate) fn confirm_deletion(&mut self) -> Vec<Effect> {
        if self.deletion.status() != crate::DeletionStatus::Confirming {
            return Vec::new();
        }
        let request_id = self.requests.allocate();
        match self.deletion.confirm_submit(request_id) {
            Some((target, message)) => {
                self.mark_dirty();
                vec![Effect::SubmitDeletion {
                    request_id,
                    target,
                    message,
                }]
            }
            None => Vec::new(),
        }
    }

    pub(crate) fn apply_deletion(&mut self, request_id: RequestId, result: Result<(), ConsoleError>) {
        let Some(resolution) = self.deletion.resolve(request_id, result) else {
            console_debug!("ignoring deletion result for request {}", request_id);
            return;
        };
        self.mark_dirty();
        if let Resolution::Succeeded(target) = resolution {
            let list = self.list_mut(target.kind);
            let before = list.len();
            list.retain(|record| record.id != target.id);
            let removed = list.len() < before;
            if removed && self.tab.list_kind() == Some(target.kind) {
                self.pagination.remove_item();
            }
        }
    }

    pub(crate) fn acknowledge_deletion_failure(&mut self) {
        if self.deletion.acknowledge_failure() {
            self.mark_dirty();
        }
    }

    /// Cancels everything scheduled: in-flight reads and the poll timer.
    pub(crate) fn teardown(&mut self) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self
            .requests
            .cancel_all()
            .into_iter()
            .map(|request_id| Effect::AbortFetch { request_id })
            .collect();
        self.disarm_poll(&mut effects);
        self.filter_sort.flush();
        self.mark_dirty();
        console_info!("console torn down");
        effects
    }
}
