//! The events that are relevant to the Gateway State Machine.

use ren_gateway_primitives::{
    deposit::DepositTransaction,
    session::GatewaySession,
    types::{Timestamp, TxHash},
};

use crate::deposit::events::DepositEvent;

/// The events that affect the Gateway State Machine.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    /// Decides where the session resumes. Delivered once, right after the machine is created.
    Restore {
        /// The current time, compared against the session's expiry.
        now: Timestamp,
    },

    /// The source chain allocated the deposit address.
    GatewayCreated {
        /// The session as returned by the source chain, carrying the address.
        session: GatewaySession,
    },

    /// The source chain failed to allocate the deposit address.
    GatewayCreationFailed {
        /// What went wrong.
        error: String,
    },

    /// The deposit watch is running.
    ListenerReady,

    /// The deposit watch could not be started or broke down.
    WatchFailed {
        /// What went wrong.
        error: String,
    },

    /// The session reached its expiry time.
    Expired,

    /// The deposit watch found a deposit.
    DepositDetected {
        /// The deposit as seen on the source chain.
        deposit: DepositTransaction,
    },

    /// Stored or chain data for a deposit.
    DepositRestored {
        /// The restored record.
        deposit: DepositTransaction,
        /// Whether this is the last payload for the deposit.
        is_final: bool,
    },

    /// An event for one deposit of this session.
    ToDeposit {
        /// Identifies the deposit.
        source_tx_hash: TxHash,
        /// The event to deliver.
        event: DepositEvent,
    },
}

impl std::fmt::Display for GatewayEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayEvent::Restore { now } => write!(f, "Restore at {now}"),
            GatewayEvent::GatewayCreated { session } => write!(
                f,
                "GatewayCreated ({})",
                session.gateway_address.as_deref().unwrap_or("no address")
            ),
            GatewayEvent::GatewayCreationFailed { error } => {
                write!(f, "GatewayCreationFailed: {error}")
            }
            GatewayEvent::ListenerReady => write!(f, "ListenerReady"),
            GatewayEvent::WatchFailed { error } => write!(f, "WatchFailed: {error}"),
            GatewayEvent::Expired => write!(f, "Expired"),
            GatewayEvent::DepositDetected { deposit } => {
                write!(f, "DepositDetected ({})", deposit.source_tx_hash())
            }
            GatewayEvent::DepositRestored { deposit, is_final } => write!(
                f,
                "DepositRestored ({}, {})",
                deposit.source_tx_hash(),
                if *is_final { "final" } else { "partial" }
            ),
            GatewayEvent::ToDeposit {
                source_tx_hash,
                event,
            } => write!(f, "{event} for deposit {source_tx_hash}"),
        }
    }
}
