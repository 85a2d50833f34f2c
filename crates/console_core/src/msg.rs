use chrono::{DateTime, Utc};

use crate::{ConsoleError, DeletionTarget, PollId, RequestId, ResourcePayload, Tab};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Host finished wiring; fetch whatever the initial tab needs.
    Started,
    /// Operator picked a tab.
    TabSelected(Tab),
    NextPage,
    PrevPage,
    PerPageChanged(u32),
    /// Operator edited the filter box.
    FilterChanged(String),
    /// The quiet period after a filter edit ran out.
    FilterDebounceElapsed { generation: u64 },
    SortChanged(String),
    /// Re-fetch everything the active tab shows.
    RefreshRequested,
    AutoRefreshToggled(bool),
    PollIntervalChanged(u64),
    /// The dashboard poll timer fired.
    PollTick { poll_id: PollId, at: DateTime<Utc> },
    /// Engine answer for a read.
    FetchCompleted {
        request_id: RequestId,
        result: Result<ResourcePayload, ConsoleError>,
    },
    /// Operator asked to remove a row of the displayed list.
    DeleteRequested(DeletionTarget),
    DeleteReasonChanged(String),
    DeleteConfirmed,
    DeleteCancelled,
    /// Engine answer for a submitted deletion.
    DeleteCompleted {
        request_id: RequestId,
        result: Result<(), ConsoleError>,
    },
    DeleteFailureAcknowledged,
    LogoutRequested,
    /// The console is going away; cancel timers and reads.
    Teardown,
    /// Fallback for placeholder wiring.
    NoOp,
}
