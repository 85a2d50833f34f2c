use thiserror::Error;

use crate::RequestId;

/// Failures the console can observe. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// The request was rejected before any response arrived.
    #[error("network failure: {0}")]
    NetworkFailure(String),
    /// The backend answered with a non-success status.
    #[error("server failure ({status}): {message}")]
    ServerFailure { status: u16, message: String },
    /// A valid response arrived for a request that is no longer current.
    #[error("stale result for request {request_id}")]
    StaleResult { request_id: RequestId },
    /// A destructive action was attempted while another one is in flight.
    #[error("another destructive action is already being submitted")]
    ConcurrentActionConflict,
}

impl ConsoleError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure(message.into())
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::ServerFailure {
            status,
            message: message.into(),
        }
    }

    /// Message worth showing to an operator, if the failure carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::ServerFailure { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}
