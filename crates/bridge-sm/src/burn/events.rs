//! The events that are relevant to the Burn State Machine.

use ren_gateway_primitives::{
    burn::SubmittedBurn,
    types::{Timestamp, TxHash},
};

/// The events that affect the Burn State Machine.
///
/// Except for [`BurnEvent::Restore`], [`BurnEvent::Submit`] and [`BurnEvent::Retry`], these are
/// reported by the burn-and-release listener.
#[derive(Debug, Clone, PartialEq)]
pub enum BurnEvent {
    /// Decides where the session resumes. Delivered once, right after the machine is created.
    Restore,

    /// The listener is ready.
    Created,

    /// Submit the burn. Sent by the user, or automatically after a short delay.
    Submit,

    /// The burn transaction was broadcast on the host chain.
    Submitted {
        /// The burn record.
        burn: SubmittedBurn,
    },

    /// A confirmation report for the burn.
    Confirmation {
        /// Current confirmation count.
        confs: u64,
        /// Required confirmation count.
        target: u64,
    },

    /// The burn reached its confirmation target.
    Confirmed {
        /// Final confirmation count.
        confs: u64,
        /// Required confirmation count.
        target: u64,
    },

    /// The protocol accepted the burn.
    Accepted {
        /// The protocol's hash for the burn.
        ren_vm_hash: String,
    },

    /// The protocol answered the release request.
    Released {
        /// Hash of the release transaction, when known.
        dest_tx_hash: Option<TxHash>,
        /// The protocol's raw response.
        ren_response: serde_json::Value,
        /// The released amount, once the release transaction was observed.
        dest_tx_amount: Option<String>,
        /// When the release was reported.
        completed_at: Timestamp,
    },

    /// Opening or submitting the burn failed.
    BurnError {
        /// What went wrong.
        error: String,
    },

    /// The release failed.
    ReleaseError {
        /// What went wrong.
        error: String,
    },

    /// Retry a failed release.
    Retry,
}

impl std::fmt::Display for BurnEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let event_str = match self {
            BurnEvent::Restore => "Restore",
            BurnEvent::Created => "Created",
            BurnEvent::Submit => "Submit",
            BurnEvent::Submitted { burn } => {
                return write!(f, "Submitted ({})", burn.source_tx_hash);
            }
            BurnEvent::Confirmation { confs, target } => {
                return write!(f, "Confirmation {confs}/{target}");
            }
            BurnEvent::Confirmed { confs, target } => {
                return write!(f, "Confirmed {confs}/{target}");
            }
            BurnEvent::Accepted { ren_vm_hash } => {
                return write!(f, "Accepted with hash {ren_vm_hash}");
            }
            BurnEvent::Released { dest_tx_hash, .. } => {
                return write!(f, "Released via {dest_tx_hash:?}");
            }
            BurnEvent::BurnError { error } => return write!(f, "BurnError: {error}"),
            BurnEvent::ReleaseError { error } => return write!(f, "ReleaseError: {error}"),
            BurnEvent::Retry => "Retry",
        };

        write!(f, "{}", event_str)
    }
}
