use std::collections::BTreeMap;

use crate::ConsoleError;

pub type RequestId = u64;

/// Fingerprint of a list fetch. Any field change makes earlier results stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
    pub sort_key: String,
    pub filter: String,
}

/// Where a fetch result lands in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceSlot {
    Dashboard,
    Users,
    Jobs,
    Leaderboards,
}

/// A read the engine should perform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRequest {
    Dashboard,
    Users(PageRequest),
    Jobs(PageRequest),
    Leaderboards,
}

impl ResourceRequest {
    pub fn slot(&self) -> ResourceSlot {
        match self {
            ResourceRequest::Dashboard => ResourceSlot::Dashboard,
            ResourceRequest::Users(_) => ResourceSlot::Users,
            ResourceRequest::Jobs(_) => ResourceSlot::Jobs,
            ResourceRequest::Leaderboards => ResourceSlot::Leaderboards,
        }
    }

    pub fn page_request(&self) -> Option<&PageRequest> {
        match self {
            ResourceRequest::Users(request) | ResourceRequest::Jobs(request) => Some(request),
            ResourceRequest::Dashboard | ResourceRequest::Leaderboards => None,
        }
    }
}

/// Bookkeeping for in-flight reads.
///
/// A completion is accepted only while its id is pending, its fingerprint
/// equals the live one, and it is newer than whatever was last applied to
/// the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct RequestTracker {
    last_id: RequestId,
    pending: BTreeMap<RequestId, ResourceRequest>,
    requested: BTreeMap<ResourceSlot, ResourceRequest>,
    applied: BTreeMap<ResourceSlot, RequestId>,
}

impl RequestTracker {
    pub(crate) fn allocate(&mut self) -> RequestId {
        self.last_id += 1;
        self.last_id
    }

    pub(crate) fn issue(&mut self, resource: ResourceRequest) -> RequestId {
        let request_id = self.allocate();
        self.requested.insert(resource.slot(), resource.clone());
        self.pending.insert(request_id, resource);
        request_id
    }

    pub(crate) fn last_requested(&self, slot: ResourceSlot) -> Option<&ResourceRequest> {
        self.requested.get(&slot)
    }

    pub(crate) fn forget_requested(&mut self, slot: ResourceSlot) {
        self.requested.remove(&slot);
    }

    pub(crate) fn is_loading(&self, slot: ResourceSlot) -> bool {
        self.pending.values().any(|resource| resource.slot() == slot)
    }

    /// Drops every pending read and returns the ids so the engine can abort them.
    pub(crate) fn cancel_all(&mut self) -> Vec<RequestId> {
        self.requested.clear();
        std::mem::take(&mut self.pending).into_keys().collect()
    }

    /// Drops pending reads in `resource`'s slot whose fingerprint differs
    /// from it. Reads for the same fingerprint stay valid and keep running.
    pub(crate) fn supersede(&mut self, resource: &ResourceRequest) -> Vec<RequestId> {
        let slot = resource.slot();
        let cancelled: Vec<RequestId> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.slot() == slot && *pending != resource)
            .map(|(id, _)| *id)
            .collect();
        for id in &cancelled {
            self.pending.remove(id);
        }
        cancelled
    }

    pub(crate) fn slot_of(&self, request_id: RequestId) -> Option<ResourceSlot> {
        self.pending.get(&request_id).map(ResourceRequest::slot)
    }

    /// Gatekeeper for completions. `live` is what the console would request
    /// for the completion's slot right now, if it still displays that slot.
    pub(crate) fn resolve(
        &mut self,
        request_id: RequestId,
        live: Option<&ResourceRequest>,
    ) -> Result<ResourceRequest, ConsoleError> {
        let stale = ConsoleError::StaleResult { request_id };
        let Some(issued) = self.pending.remove(&request_id) else {
            return Err(stale);
        };
        let slot = issued.slot();
        if live != Some(&issued) {
            // Nothing in flight answers this fingerprint any more, so the
            // slot must be fetched again if it becomes live later.
            let still_pending = self.pending.values().any(|pending| *pending == issued);
            if !still_pending && self.requested.get(&slot) == Some(&issued) {
                self.requested.remove(&slot);
            }
            return Err(stale);
        }
        if self
            .applied
            .get(&slot)
            .is_some_and(|applied| *applied > request_id)
        {
            return Err(stale);
        }
        self.applied.insert(slot, request_id);
        Ok(issued)
    }
}

#[cfg(test)]
mod tests {
    use super::{PageRequest, RequestTracker, ResourceRequest};
    use crate::ConsoleError;

    fn users(page: u32) -> ResourceRequest {
        ResourceRequest::Users(PageRequest {
            page,
            per_page: 10,
            sort_key: "newest".to_string(),
            filter: String::new(),
        })
    }

    #[test]
    fn older_result_with_same_fingerprint_loses_to_newer() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue(users(1));
        let second = tracker.issue(users(1));

        assert!(tracker.resolve(second, Some(&users(1))).is_ok());
        assert_eq!(
            tracker.resolve(first, Some(&users(1))),
            Err(ConsoleError::StaleResult { request_id: first })
        );
    }

    #[test]
    fn stale_completion_forgets_its_fingerprint() {
        let mut tracker = RequestTracker::default();
        let id = tracker.issue(users(1));

        assert!(tracker.resolve(id, Some(&users(2))).is_err());
        assert!(tracker.last_requested(users(1).slot()).is_none());
    }

    #[test]
    fn supersede_keeps_reads_with_the_same_fingerprint() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue(users(1));
        let second = tracker.issue(users(2));

        assert_eq!(tracker.supersede(&users(2)), vec![first]);
        assert!(tracker.supersede(&users(2)).is_empty());
        assert_eq!(tracker.slot_of(second), Some(users(2).slot()));
    }

    #[test]
    fn cancelled_ids_are_stale() {
        let mut tracker = RequestTracker::default();
        let id = tracker.issue(ResourceRequest::Dashboard);
        assert_eq!(tracker.cancel_all(), vec![id]);
        assert!(tracker.resolve(id, Some(&ResourceRequest::Dashboard)).is_err());
        assert!(tracker.last_requested(ResourceRequest::Dashboard.slot()).is_none());
    }
}
