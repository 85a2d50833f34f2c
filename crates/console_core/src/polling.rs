use chrono::{DateTime, Utc};

pub type PollId = u64;

/// Auto-refresh state of the stats tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PollState {
    enabled: bool,
    interval_ms: u64,
    last_fetch_at: Option<DateTime<Utc>>,
    armed: Option<PollId>,
    last_id: PollId,
}

impl PollState {
    pub(crate) fn new(enabled: bool, interval_ms: u64) -> Self {
        Self {
            enabled,
            interval_ms: interval_ms.max(1),
            last_fetch_at: None,
            armed: None,
            last_id: 0,
        }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub(crate) fn last_fetch_at(&self) -> Option<DateTime<Utc>> {
        self.last_fetch_at
    }

    pub(crate) fn armed(&self) -> Option<PollId> {
        self.armed
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }

    pub(crate) fn set_interval(&mut self, interval_ms: u64) -> bool {
        let interval_ms = interval_ms.max(1);
        let changed = self.interval_ms != interval_ms;
        self.interval_ms = interval_ms;
        changed
    }

    /// Starts a new generation, replacing any armed one.
    pub(crate) fn arm(&mut self) -> PollId {
        self.last_id += 1;
        self.armed = Some(self.last_id);
        self.last_id
    }

    /// Returns whether a generation was armed.
    pub(crate) fn disarm(&mut self) -> bool {
        self.armed.take().is_some()
    }

    /// Records a tick of the armed generation; other generations are refused.
    pub(crate) fn accept_tick(&mut self, poll_id: PollId, at: DateTime<Utc>) -> bool {
        if self.armed != Some(poll_id) {
            return false;
        }
        self.last_fetch_at = Some(at);
        true
    }
}
