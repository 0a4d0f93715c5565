//! Handles through which callers control and observe running sessions.

use ren_gateway_primitives::types::{now_millis, CustomParams};
use ren_gateway_sm::{
    burn::{events::BurnEvent, machine::BurnSM},
    deposit::events::DepositEvent,
    gateway::{events::GatewayEvent, machine::GatewaySM},
};
use tokio::sync::{mpsc::UnboundedSender, watch};
use tokio_util::sync::CancellationToken;

use crate::errors::DriverError;

/// A handle to a running session whose machine is of type `M` and accepts events of type `E`.
///
/// Handles are cheap to clone. Every clone controls the same session.
#[derive(Debug, Clone)]
pub struct SessionHandle<M, E> {
    session_id: String,
    controls: UnboundedSender<E>,
    snapshots: watch::Receiver<M>,
    shutdown: CancellationToken,
}

/// A handle to a running lock-and-mint session.
pub type GatewayHandle = SessionHandle<GatewaySM, GatewayEvent>;

/// A handle to a running burn-and-release session.
pub type BurnHandle = SessionHandle<BurnSM, BurnEvent>;

impl<M: Clone, E> SessionHandle<M, E> {
    pub(crate) const fn new(
        session_id: String,
        controls: UnboundedSender<E>,
        snapshots: watch::Receiver<M>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            session_id,
            controls,
            snapshots,
            shutdown,
        }
    }

    /// The id of the session.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the machine as of the last processed event.
    ///
    /// The machine and its session record are plain data and can be persisted verbatim.
    pub fn snapshot(&self) -> M {
        self.snapshots.borrow().clone()
    }

    /// Returns a receiver that is notified after every event the session accepts.
    pub fn subscribe(&self) -> watch::Receiver<M> {
        self.snapshots.clone()
    }

    /// Asks the session to stop. The session's task resolves to its last snapshot once its duties
    /// have been cancelled.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn send(&self, event: E) -> Result<(), DriverError> {
        self.controls
            .send(event)
            .map_err(|_| DriverError::SessionStopped(self.session_id.clone()))
    }
}

impl GatewayHandle {
    fn to_deposit(&self, source_tx_hash: &str, event: DepositEvent) -> Result<(), DriverError> {
        self.send(GatewayEvent::ToDeposit {
            source_tx_hash: source_tx_hash.to_string(),
            event,
        })
    }

    /// Claims an accepted deposit, submitting its mint with the given contract call parameters.
    ///
    /// Also retries a mint whose submission failed.
    pub fn claim(&self, source_tx_hash: &str, params: CustomParams) -> Result<(), DriverError> {
        self.to_deposit(source_tx_hash, DepositEvent::Claim { params })
    }

    /// Rejects a deposit so that it is never minted.
    pub fn reject(&self, source_tx_hash: &str) -> Result<(), DriverError> {
        self.to_deposit(source_tx_hash, DepositEvent::Reject)
    }

    /// Acknowledges the mint of a deposit, completing it.
    pub fn acknowledge(&self, source_tx_hash: &str) -> Result<(), DriverError> {
        self.to_deposit(source_tx_hash, DepositEvent::Acknowledge { at: now_millis() })
    }
}

impl BurnHandle {
    /// Submits the burn.
    pub fn submit(&self) -> Result<(), DriverError> {
        self.send(BurnEvent::Submit)
    }

    /// Retries a failed release.
    pub fn retry(&self) -> Result<(), DriverError> {
        self.send(BurnEvent::Retry)
    }
}
