//! The duties that need to be performed in the Gateway State Machine in response to the state
//! transitions.

use ren_gateway_primitives::{
    deposit::{DepositTransaction, SubmittingDeposit},
    session::GatewaySession,
    types::TxHash,
};

/// The duties that need to be performed to drive the Gateway State Machine forward.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayDuty {
    /// Allocate a deposit address on the source chain.
    CreateGatewayAddress {
        /// The session to allocate the address for.
        session: GatewaySession,
    },
    /// Start watching the deposit address for deposits.
    WatchDeposits {
        /// The opened session.
        session: GatewaySession,
    },
    /// Stop the deposit watch and every confirmation watch of the session.
    CancelWatch,
    /// Fetch fresh chain data for a deposit and report it as a final restore.
    RestoreDeposit {
        /// The deposit as currently recorded.
        deposit: DepositTransaction,
    },
    /// Track the confirmations of a deposit until it settles.
    WatchConfirmations {
        /// The deposit to watch.
        deposit: DepositTransaction,
    },
    /// Stop the confirmation watch of a deposit that reached a terminal state.
    CancelConfirmations {
        /// The hash of the deposit.
        source_tx_hash: TxHash,
    },
    /// Ask the protocol to sign a settled deposit.
    RequestSignature {
        /// The deposit to sign.
        deposit: DepositTransaction,
    },
    /// Submit the mint for a claimed deposit on the destination chain.
    SubmitMint {
        /// The submission record.
        deposit: SubmittingDeposit,
    },
}

impl std::fmt::Display for GatewayDuty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            GatewayDuty::CreateGatewayAddress { session } => {
                format!("CreateGatewayAddress (session: {})", session.id)
            }
            GatewayDuty::WatchDeposits { session } => format!(
                "WatchDeposits (address: {})",
                session.gateway_address.as_deref().unwrap_or_default()
            ),
            GatewayDuty::CancelWatch => "CancelWatch".to_string(),
            GatewayDuty::RestoreDeposit { deposit } => {
                format!("RestoreDeposit ({})", deposit.source_tx_hash())
            }
            GatewayDuty::WatchConfirmations { deposit } => {
                format!("WatchConfirmations ({})", deposit.source_tx_hash())
            }
            GatewayDuty::CancelConfirmations { source_tx_hash } => {
                format!("CancelConfirmations ({source_tx_hash})")
            }
            GatewayDuty::RequestSignature { deposit } => {
                format!("RequestSignature ({})", deposit.source_tx_hash())
            }
            GatewayDuty::SubmitMint { deposit } => format!(
                "SubmitMint ({})",
                deposit.accepted.confirming.detected.source_tx_hash
            ),
        };
        write!(f, "{}", display_str)
    }
}
