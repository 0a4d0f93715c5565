//! The states of the Deposit State Machine.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The state of a single deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DepositState {
    /// Initial state. Checks whether the deposit already completed in an earlier run.
    CheckingCompletion,

    /// Waiting for the stored record and fresh chain data for the deposit.
    RestoringDeposit,

    /// The deposit could not be restored.
    ErrorRestoring,

    /// The deposit is gaining confirmations on the source chain.
    SrcSettling,

    /// The deposit reached its confirmation target and awaits the protocol's signature.
    SrcConfirmed,

    /// The protocol signed the deposit; it can be claimed.
    Accepted,

    /// The protocol failed to sign the deposit.
    ErrorAccepting,

    /// The mint is being submitted to the destination chain.
    Claiming,

    /// Submitting the mint failed; the deposit can be claimed again.
    ErrorSubmitting,

    /// The mint was broadcast and awaits acknowledgement.
    DestInitiated,

    /// The mint result was acknowledged.
    Completed,

    /// The deposit was reverted on the source chain or rejected by the user.
    Rejected,
}

impl DepositState {
    /// Whether no event can move the deposit out of this state.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            DepositState::ErrorRestoring
                | DepositState::ErrorAccepting
                | DepositState::Completed
                | DepositState::Rejected
        )
    }
}

impl Display for DepositState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            DepositState::CheckingCompletion => "CheckingCompletion",
            DepositState::RestoringDeposit => "RestoringDeposit",
            DepositState::ErrorRestoring => "ErrorRestoring",
            DepositState::SrcSettling => "SrcSettling",
            DepositState::SrcConfirmed => "SrcConfirmed",
            DepositState::Accepted => "Accepted",
            DepositState::ErrorAccepting => "ErrorAccepting",
            DepositState::Claiming => "Claiming",
            DepositState::ErrorSubmitting => "ErrorSubmitting",
            DepositState::DestInitiated => "DestInitiated",
            DepositState::Completed => "Completed",
            DepositState::Rejected => "Rejected",
        };
        write!(f, "{}", display_str)
    }
}
