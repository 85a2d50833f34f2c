use crate::{DeletionTarget, PollId, RequestId, ResourceRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch {
        request_id: RequestId,
        resource: ResourceRequest,
    },
    /// The read is no longer wanted; its result would be discarded anyway.
    AbortFetch { request_id: RequestId },
    ScheduleDebounce { generation: u64, delay_ms: u64 },
    /// Replace any running poll timer with one for `poll_id`, first tick now.
    ArmPolling { poll_id: PollId, interval_ms: u64 },
    DisarmPolling,
    SubmitDeletion {
        request_id: RequestId,
        target: DeletionTarget,
        message: String,
    },
    /// Hand control to the session collaborator.
    Logout,
}
