//! Error types for the orchestrator crate.

use std::fmt::{Debug, Display};

use ren_gateway_exec::errors::ExecutorError;
use ren_gateway_sm::errors::SessionSMError;
use thiserror::Error;
use tracing::warn;

/// Error emitted when processing an event for a session.
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    /// The event violated the contract of the session's state machine.
    #[error("Session {0} received an event that violates its contract: {1}")]
    InvariantViolation(String, String),

    /// A duplicate event was detected during processing, which can happen when a chain redelivers
    /// a report or the user repeats a command.
    #[error("A duplicate event {1} was detected for session {0}")]
    DuplicateEvent(String, String),

    /// The event was rejected by the state machine, which can happen for example if the event is
    /// no longer relevant.
    #[error("Event {1} was rejected by session {0}: {2}")]
    EventRejected(String, String, String),
}

impl ProcessError {
    /// Classifies an error returned by the state machine of the given session.
    pub fn from_sm_error<S, E>(session_id: &str, err: SessionSMError<S, E>) -> Self
    where
        S: Display + Debug,
        E: Display + Debug,
    {
        match err {
            SessionSMError::InvalidEvent { .. } => {
                ProcessError::InvariantViolation(session_id.to_string(), err.to_string())
            }
            SessionSMError::Duplicate { event, .. } => {
                ProcessError::DuplicateEvent(session_id.to_string(), event.to_string())
            }
            SessionSMError::Rejected { event, reason, .. } => {
                ProcessError::EventRejected(session_id.to_string(), event.to_string(), reason)
            }
        }
    }

    /// Whether the session must stop because of this error.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, ProcessError::InvariantViolation(..))
    }

    /// Logs and swallows non-fatal errors. Fatal errors are handed back to stop the driver.
    pub(crate) fn absorb(self) -> Result<(), DriverError> {
        match self {
            // a chain may redeliver a report and a user may repeat a command
            ProcessError::DuplicateEvent(session_id, event) => {
                warn!(%session_id, %event, "duplicate event, skipping");
                Ok(())
            }
            // the event may have been overtaken by another one
            ProcessError::EventRejected(session_id, event, reason) => {
                warn!(%session_id, %event, %reason, "event rejected by state machine, skipping");
                Ok(())
            }
            fatal => Err(fatal.into()),
        }
    }
}

/// Errors that stop a session driver or prevent a caller from reaching it.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The state machine reported a contract violation.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// A duty failed in a way that breaks the session's contract with its capabilities.
    #[error("duty execution failed: {0}")]
    Executor(#[from] ExecutorError),

    /// The session is no longer running.
    #[error("session {0} is no longer running")]
    SessionStopped(String),
}
