//! Admin console core: pure state machine and view-model helpers.
mod deletion;
mod effect;
mod error;
mod filter_sort;
mod msg;
mod pagination;
mod polling;
mod records;
mod request;
mod state;
mod stats;
mod tab;
mod update;
mod view_model;

pub use deletion::{DeletionStatus, DeletionTarget, PendingDeletion, TargetKind};
pub use effect::Effect;
pub use error::ConsoleError;
pub use msg::Msg;
pub use pagination::compute_total_pages;
pub use polling::PollId;
pub use records::{
    DashboardSnapshot, LeaderboardPair, ListResult, Record, RecordId, ResourcePayload,
};
pub use request::{PageRequest, RequestId, ResourceRequest, ResourceSlot};
pub use state::{ConsoleSettings, ConsoleState};
pub use stats::{
    category_series, job_series, role_series, ChartSeries, SeriesPoint, JOB_CATEGORIES,
    ROLE_CATEGORIES,
};
pub use tab::{Tab, UnknownTab};
pub use update::update;
pub use view_model::{
    ConsoleViewModel, DashboardView, DeletionView, LeaderboardView, PollView, RecordRow,
};
