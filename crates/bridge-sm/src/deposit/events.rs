//! The events that are relevant to the Deposit State Machine.
//!
//! Depending upon the exact state that the state machine is in, these events will trigger
//! different transitions and emit signals to the owning gateway.

use ren_gateway_primitives::{
    deposit::DepositTransaction,
    types::{CustomParams, Timestamp, TxHash},
};

/// The events that affect the Deposit State Machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DepositEvent {
    /// Evaluates whether the deposit already completed. Delivered once, right after spawning.
    Check,

    /// Stored or chain data to merge into the deposit.
    Restored {
        /// The reported record.
        deposit: DepositTransaction,
        /// Whether this is the last payload; a final restore resumes the deposit.
        is_final: bool,
    },

    /// Restoring or watching the deposit failed.
    Error {
        /// What went wrong.
        error: String,
    },

    /// A confirmation report from the source chain.
    Confirmation {
        /// Current confirmation count.
        confs: u64,
        /// Required confirmation count, if known.
        target: Option<u64>,
    },

    /// The deposit reached its confirmation target.
    Confirmed {
        /// Final confirmation count.
        confs: u64,
        /// Required confirmation count.
        target: u64,
    },

    /// The protocol signed the deposit.
    Signed {
        /// The protocol's hash for the deposit.
        ren_vm_hash: String,
        /// The signature that authorizes the mint.
        ren_signature: String,
    },

    /// The protocol failed to sign the deposit.
    SignError {
        /// What went wrong.
        error: String,
    },

    /// The deposit was reverted on the source chain.
    Reverted {
        /// Why the deposit is considered reverted.
        reason: String,
    },

    /// The user claims the deposit with the given destination-call parameters.
    Claim {
        /// Parameters of the destination contract call.
        params: CustomParams,
    },

    /// The user rejects the deposit.
    Reject,

    /// The mint was broadcast on the destination chain.
    Submitted {
        /// Hash of the mint transaction.
        dest_tx_hash: TxHash,
        /// The minted amount, if already final.
        dest_tx_amount: Option<String>,
    },

    /// Submitting the mint failed.
    SubmitError {
        /// What went wrong.
        error: String,
    },

    /// The user acknowledged the mint result.
    Acknowledge {
        /// When the result was acknowledged.
        at: Timestamp,
    },
}

impl std::fmt::Display for DepositEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let event_str = match self {
            DepositEvent::Check => "Check",
            DepositEvent::Restored { deposit, is_final } => {
                return write!(
                    f,
                    "Restored ({}) at stage {:?}",
                    if *is_final { "final" } else { "partial" },
                    deposit.stage()
                );
            }
            DepositEvent::Error { error } => return write!(f, "Error: {error}"),
            DepositEvent::Confirmation { confs, target } => {
                return write!(f, "Confirmation {confs}/{target:?}");
            }
            DepositEvent::Confirmed { confs, target } => {
                return write!(f, "Confirmed {confs}/{target}");
            }
            DepositEvent::Signed { ren_vm_hash, .. } => {
                return write!(f, "Signed with hash {ren_vm_hash}");
            }
            DepositEvent::SignError { error } => return write!(f, "SignError: {error}"),
            DepositEvent::Reverted { reason } => return write!(f, "Reverted: {reason}"),
            DepositEvent::Claim { .. } => "Claim",
            DepositEvent::Reject => "Reject",
            DepositEvent::Submitted { dest_tx_hash, .. } => {
                return write!(f, "Submitted via {dest_tx_hash}");
            }
            DepositEvent::SubmitError { error } => return write!(f, "SubmitError: {error}"),
            DepositEvent::Acknowledge { at } => return write!(f, "Acknowledge at {at}"),
        };

        write!(f, "{}", event_str)
    }
}
