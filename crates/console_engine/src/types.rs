use std::io;

use chrono::{DateTime, Utc};
use console_core::{ConsoleError, PollId, RequestId, ResourcePayload};
use thiserror::Error;

/// What the engine reports back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    FetchCompleted {
        request_id: RequestId,
        result: Result<ResourcePayload, ConsoleError>,
    },
    DeleteCompleted {
        request_id: RequestId,
        result: Result<(), ConsoleError>,
    },
    PollTick {
        poll_id: PollId,
        at: DateTime<Utc>,
    },
    DebounceElapsed {
        generation: u64,
    },
}

/// Failures while setting the engine up. Request failures are `ConsoleError`s.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid base url `{url}`: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
}

/// Receiver of engine events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
