//! Errors related to the state transitions in the session state machines.

use thiserror::Error;

/// Errors that can occur in any session state machine.
#[derive(Debug, Clone, Error)]
pub enum SessionSMError<S, E>
where
    S: std::fmt::Display + std::fmt::Debug,
    E: std::fmt::Display + std::fmt::Debug,
{
    /// An event violated the machine's contract in the current state.
    ///
    /// This type of error is fatal for the session.
    #[error("Received invalid event {event} in state {state}; reason: {reason:?}")]
    InvalidEvent {
        /// The state in which the event was received.
        state: Box<S>,
        /// The invalid event that was received.
        event: Box<E>,
        /// The reason for the invalidity.
        reason: Option<String>, // sometimes the reason is obvious from context or unknown
    },

    /// A re-delivered or stale event was received in the current state.
    #[error("Received a duplicate event {event} in state {state}")]
    Duplicate {
        /// The state in which the duplicate event was received.
        state: Box<S>,
        /// The duplicate event that was received.
        event: Box<E>,
    },

    /// An event was rejected in the current state.
    ///
    /// This can happen, for example, if the event is no longer relevant due to a state change.
    #[error("Event {event} rejected in state: {state}, reason: {reason}")]
    Rejected {
        /// The state in which the event was rejected.
        state: Box<S>,
        /// The reason for the rejection.
        reason: String, // rejection reason is a must
        /// The rejected event.
        event: Box<E>,
    },
}

impl<S, E> SessionSMError<S, E>
where
    S: std::fmt::Display + std::fmt::Debug,
    E: std::fmt::Display + std::fmt::Debug,
{
    pub(crate) fn invalid_event(state: S, event: E, reason: Option<String>) -> Self {
        SessionSMError::InvalidEvent {
            state: Box::new(state),
            event: Box::new(event),
            reason,
        }
    }

    pub(crate) fn duplicate(state: S, event: E) -> Self {
        SessionSMError::Duplicate {
            state: Box::new(state),
            event: Box::new(event),
        }
    }

    pub(crate) fn rejected(state: S, event: E, reason: impl Into<String>) -> Self {
        SessionSMError::Rejected {
            state: Box::new(state),
            reason: reason.into(),
            event: Box::new(event),
        }
    }

    /// Whether the error is a contract violation rather than a stale or irrelevant event.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, SessionSMError::InvalidEvent { .. })
    }
}
