//! The states of the Gateway State Machine.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The state of a lock-and-mint session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GatewayState {
    /// Initial state. Decides where a (possibly persisted) session resumes.
    Restoring,

    /// Waiting for the source chain to allocate the deposit address.
    Creating,

    /// The deposit address could not be allocated or the deposit watch could not be started.
    ///
    /// A fresh session has to be started to retry.
    SrcInitializeError,

    /// Watching for deposits and driving the deposits that were found.
    Listening,

    /// The session expired.
    Completed,
}

impl GatewayState {
    /// Whether no event can move the session out of this state.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            GatewayState::SrcInitializeError | GatewayState::Completed
        )
    }
}

impl Display for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            GatewayState::Restoring => "Restoring",
            GatewayState::Creating => "Creating",
            GatewayState::SrcInitializeError => "SrcInitializeError",
            GatewayState::Listening => "Listening",
            GatewayState::Completed => "Completed",
        };
        write!(f, "{}", display_str)
    }
}
