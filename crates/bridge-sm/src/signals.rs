//! Messages that need to be transferred between different session state machines.

use std::convert::Infallible;

use ren_gateway_primitives::deposit::{DepositTransaction, SubmittingDeposit};

/// The signals that need to be sent across different state machines.
///
/// This is a sum of directional contracts between different state machines. Each variant
/// represents a distinct wire protocol between two state machines.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Messages from a Deposit State Machine.
    FromDeposit(DepositSignal),
}

/// Machines that emit no signals use [`Infallible`] as their signal type.
impl From<Infallible> for Signal {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Signals that the [Deposit State Machine](crate::deposit::machine::DepositSM) can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum DepositSignal {
    /// Signal to the owning Gateway State Machine.
    ToGateway(DepositToGateway),
}

impl From<DepositSignal> for Signal {
    fn from(sig: DepositSignal) -> Self {
        Signal::FromDeposit(sig)
    }
}

impl From<DepositToGateway> for DepositSignal {
    fn from(sig: DepositToGateway) -> Self {
        DepositSignal::ToGateway(sig)
    }
}

/// The signals that need to be sent from a [Deposit State
/// Machine](crate::deposit::machine::DepositSM) to its [Gateway State
/// Machine](crate::gateway::machine::GatewaySM).
///
/// The gateway knows which child emitted a signal, so the deposit is identified by the record
/// each signal carries.
#[derive(Debug, Clone, PartialEq)]
pub enum DepositToGateway {
    /// The deposit needs its stored and on-chain data to resume.
    RequestRestore {
        /// The deposit as currently known by the child.
        deposit: DepositTransaction,
    },

    /// The deposit is waiting for confirmations on the source chain.
    Settle {
        /// The deposit to watch.
        deposit: DepositTransaction,
    },

    /// The deposit reached its confirmation target and needs the protocol's signature.
    Sign {
        /// The deposit to sign.
        deposit: DepositTransaction,
    },

    /// The deposit can be claimed on the destination chain.
    Claimable {
        /// The claimable deposit.
        deposit: DepositTransaction,
    },

    /// The deposit's mint call must be submitted to the destination chain.
    Mint {
        /// The submission record for the mint.
        deposit: SubmittingDeposit,
    },

    /// The deposit's record changed.
    Update {
        /// The child's latest record.
        deposit: DepositTransaction,
    },
}

impl std::fmt::Display for DepositToGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (kind, hash) = match self {
            DepositToGateway::RequestRestore { deposit } => ("RequestRestore", deposit.source_tx_hash()),
            DepositToGateway::Settle { deposit } => ("Settle", deposit.source_tx_hash()),
            DepositToGateway::Sign { deposit } => ("Sign", deposit.source_tx_hash()),
            DepositToGateway::Claimable { deposit } => ("Claimable", deposit.source_tx_hash()),
            DepositToGateway::Mint { deposit } => {
                ("Mint", &deposit.accepted.confirming.detected.source_tx_hash)
            }
            DepositToGateway::Update { deposit } => ("Update", deposit.source_tx_hash()),
        };

        write!(f, "{kind} for deposit {hash}")
    }
}
