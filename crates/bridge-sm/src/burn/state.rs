//! The states of the Burn State Machine.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The state of a burn-and-release session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BurnState {
    /// Initial state. Decides where a (possibly persisted) session resumes.
    Restoring,

    /// Waiting for the burn-and-release listener to come up.
    Creating,

    /// The listener is ready; waiting for the burn to be submitted.
    Created,

    /// The burn is being submitted on the host chain.
    SubmittingBurn,

    /// The burn is gaining confirmations on the host chain.
    SrcSettling,

    /// The burn failed. The on-chain outcome is unknown, so a fresh session is required.
    ErrorBurning,

    /// The burn settled and its release was requested.
    SrcConfirmed,

    /// The protocol accepted the burn.
    Accepted,

    /// The release failed and can be retried.
    ErrorReleasing,

    /// The protocol answered the release request.
    DestInitiated,
}

impl BurnState {
    /// Whether no event can move the session out of this state.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, BurnState::ErrorBurning | BurnState::DestInitiated)
    }
}

impl Display for BurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            BurnState::Restoring => "Restoring",
            BurnState::Creating => "Creating",
            BurnState::Created => "Created",
            BurnState::SubmittingBurn => "SubmittingBurn",
            BurnState::SrcSettling => "SrcSettling",
            BurnState::ErrorBurning => "ErrorBurning",
            BurnState::SrcConfirmed => "SrcConfirmed",
            BurnState::Accepted => "Accepted",
            BurnState::ErrorReleasing => "ErrorReleasing",
            BurnState::DestInitiated => "DestInitiated",
        };
        write!(f, "{}", display_str)
    }
}
