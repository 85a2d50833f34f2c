use std::fmt;

use console_logging::{console_info, console_warn};

use crate::{ConsoleError, RecordId, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    User,
    Job,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::User => "user",
            TargetKind::Job => "job",
        }
    }

    /// Shown when the backend gives no usable reason.
    pub fn fallback_failure_message(self) -> &'static str {
        match self {
            TargetKind::User => "Failed to remove user",
            TargetKind::Job => "Failed to remove job",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeletionTarget {
    pub kind: TargetKind,
    pub id: RecordId,
}

impl DeletionTarget {
    pub fn new(kind: TargetKind, id: impl Into<RecordId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// Settled states of the removal dialog. A successful submission settles in
/// `Idle`; a failed one settles in `Confirming` with its failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionStatus {
    #[default]
    Idle,
    Confirming,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub target: DeletionTarget,
    pub reason_message: String,
    pub status: DeletionStatus,
    pub failure: Option<String>,
    pub request_id: Option<RequestId>,
}

/// How a submitted deletion ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    Succeeded(DeletionTarget),
    Failed { target: DeletionTarget, message: String },
}

/// Confirm/submit/resolve lifecycle of a single destructive action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct DeletionFlow {
    pending: Option<PendingDeletion>,
}

impl DeletionFlow {
    pub(crate) fn pending(&self) -> Option<&PendingDeletion> {
        self.pending.as_ref()
    }

    pub(crate) fn status(&self) -> DeletionStatus {
        self.pending
            .as_ref()
            .map_or(DeletionStatus::Idle, |pending| pending.status)
    }

    pub(crate) fn is_submitting(&self) -> bool {
        self.status() == DeletionStatus::Submitting
    }

    /// Opens a confirmation for `target`. A confirmation that was never
    /// submitted is replaced; a submission in flight is never replaced.
    pub(crate) fn select_target(&mut self, target: DeletionTarget) -> Result<(), ConsoleError> {
        if self.is_submitting() {
            return Err(ConsoleError::ConcurrentActionConflict);
        }
        console_info!("deletion: idle -> confirming {} {}", target.kind, target.id);
        self.pending = Some(PendingDeletion {
            target,
            reason_message: String::new(),
            status: DeletionStatus::Confirming,
            failure: None,
            request_id: None,
        });
        Ok(())
    }

    pub(crate) fn set_reason(&mut self, text: impl Into<String>) -> bool {
        match self.pending.as_mut() {
            Some(pending) if pending.status == DeletionStatus::Confirming => {
                pending.reason_message = text.into();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cancel(&mut self) -> bool {
        match self.status() {
            DeletionStatus::Confirming => {
                console_info!("deletion: confirming -> idle (cancelled)");
                self.pending = None;
                true
            }
            DeletionStatus::Submitting => {
                console_warn!("deletion: cannot cancel a submission in flight");
                false
            }
            _ => false,
        }
    }

    /// Moves to `Submitting`; returns what must be sent to the backend.
    pub(crate) fn confirm_submit(&mut self, request_id: RequestId) -> Option<(DeletionTarget, String)> {
        let pending = self.pending.as_mut()?;
        if pending.status != DeletionStatus::Confirming {
            return None;
        }
        console_info!(
            "deletion: confirming -> submitting {} {} (request {})",
            pending.target.kind,
            pending.target.id,
            request_id
        );
        pending.status = DeletionStatus::Submitting;
        pending.failure = None;
        pending.request_id = Some(request_id);
        Some((pending.target.clone(), pending.reason_message.clone()))
    }

    /// Applies the backend answer for the submission `request_id`.
    ///
    /// Success settles in idle. Failure returns to `Confirming` and keeps the
    /// message visible.
    pub(crate) fn resolve(
        &mut self,
        request_id: RequestId,
        result: Result<(), ConsoleError>,
    ) -> Option<Resolution> {
        let pending = self.pending.as_mut()?;
        if pending.status != DeletionStatus::Submitting || pending.request_id != Some(request_id) {
            return None;
        }
        match result {
            Ok(()) => {
                let target = pending.target.clone();
                console_info!(
                    "deletion: submitting -> succeeded -> idle {} {}",
                    target.kind,
                    target.id
                );
                self.pending = None;
                Some(Resolution::Succeeded(target))
            }
            Err(err) => {
                let message = err
                    .server_message()
                    .unwrap_or(pending.target.kind.fallback_failure_message())
                    .to_string();
                console_warn!(
                    "deletion: submitting -> failed -> confirming {} {}: {}",
                    pending.target.kind,
                    pending.target.id,
                    err
                );
                pending.status = DeletionStatus::Confirming;
                pending.request_id = None;
                pending.failure = Some(message.clone());
                Some(Resolution::Failed {
                    target: pending.target.clone(),
                    message,
                })
            }
        }
    }

    pub(crate) fn acknowledge_failure(&mut self) -> bool {
        match self.pending.as_mut() {
            Some(pending) if pending.failure.is_some() => {
                pending.failure = None;
                true
            }
            _ => false,
        }
    }
}
