//! The capability of the chain a deposit is made on.

use std::fmt::Debug;

use async_trait::async_trait;
use ren_gateway_primitives::{
    deposit::DetectedDeposit, session::GatewaySession, subscription::Subscription, types::TxHash,
};

use crate::errors::CapabilityResult;

/// Activity reported by a deposit watch.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceChainEvent {
    /// A deposit to the gateway address was seen.
    Detected(DetectedDeposit),

    /// A previously reported deposit was reverted.
    Reverted {
        /// The deposit that was reverted.
        source_tx_hash: TxHash,

        /// Why the chain considers it reverted.
        reason: String,
    },
}

/// Access to the chain that assets are locked on.
#[async_trait]
pub trait SourceChain: Debug + Send + Sync {
    /// Allocates a deposit address or account for the session.
    ///
    /// Returns the session with `gateway_address` set.
    async fn create_gateway(&self, session: &GatewaySession) -> CapabilityResult<GatewaySession>;

    /// Starts watching the session's deposit address.
    ///
    /// The watch stops when the returned subscription is dropped.
    async fn watch_deposits(
        &self,
        session: &GatewaySession,
    ) -> CapabilityResult<Subscription<SourceChainEvent>>;

    /// Starts watching the confirmation count of a deposit.
    ///
    /// Implementations may redeliver stale counts.
    async fn watch_confirmations(&self, source_tx_hash: &TxHash)
        -> CapabilityResult<Subscription<u64>>;

    /// Returns the current confirmation count of a deposit.
    async fn confirmations(&self, source_tx_hash: &TxHash) -> CapabilityResult<u64>;

    /// Returns the number of confirmations a deposit needs, if the chain can tell.
    async fn confirmation_target(&self, source_tx_hash: &TxHash) -> CapabilityResult<Option<u64>>;
}
