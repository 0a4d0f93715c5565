//! The Gateway State Machine (GSM).
//!
//! Responsible for driving a lock-and-mint session and the deposits found for it.

use std::collections::{BTreeMap, BTreeSet};

use ren_gateway_primitives::{session::GatewaySession, types::TxHash};
use serde::{Deserialize, Serialize};

use crate::{
    deposit::machine::DepositSM,
    gateway::{
        context::GatewaySMCtx, duties::GatewayDuty, errors::GSMError, events::GatewayEvent,
        state::GatewayState,
    },
    state_machine::{SMOutput, StateMachine},
};

/// The State Machine that drives one lock-and-mint session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewaySM {
    /// Context associated with this Gateway State Machine instance.
    pub context: GatewaySMCtx,
    /// The current state of the Gateway State Machine.
    pub state: GatewayState,
}

impl StateMachine for GatewaySM {
    type Config = ();
    type Duty = GatewayDuty;
    // the gateway has no parent to signal
    type OutgoingSignal = std::convert::Infallible;
    type Event = GatewayEvent;
    type Error = GSMError;

    fn process_event(
        &mut self,
        _cfg: Self::Config,
        event: Self::Event,
    ) -> Result<SMOutput<Self::Duty, Self::OutgoingSignal>, Self::Error> {
        if self.state.is_terminal() {
            return Err(GSMError::rejected(
                self.state,
                event,
                "session is in a terminal state",
            ));
        }

        match event {
            GatewayEvent::Restore { now } => self.process_restore(now),
            GatewayEvent::GatewayCreated { session } => self.process_gateway_created(session),
            GatewayEvent::GatewayCreationFailed { error } => {
                self.process_gateway_creation_failed(error)
            }
            GatewayEvent::ListenerReady => self.process_listener_ready(),
            GatewayEvent::WatchFailed { error } => self.process_watch_failed(error),
            GatewayEvent::Expired => self.process_expired(),
            GatewayEvent::DepositDetected { deposit } => self.process_deposit_detected(deposit),
            GatewayEvent::DepositRestored { deposit, is_final } => {
                self.process_deposit_restored(deposit, is_final)
            }
            GatewayEvent::ToDeposit {
                source_tx_hash,
                event,
            } => self.process_to_deposit(source_tx_hash, event),
        }
    }
}

/// The output of the Gateway State Machine after processing an event.
pub type GSMOutput = SMOutput<GatewayDuty, std::convert::Infallible>;

impl GatewaySM {
    /// Creates a new [`GatewaySM`] for the given session, starting in [`GatewayState::Restoring`].
    ///
    /// The session may be fresh or a persisted snapshot. Deposits recorded in it are respawned
    /// once the deposit watch is running.
    pub const fn new(tx: GatewaySession) -> Self {
        Self {
            context: GatewaySMCtx::new(tx),
            state: GatewayState::Restoring,
        }
    }

    /// Returns a reference to the session record.
    pub const fn tx(&self) -> &GatewaySession {
        &self.context.tx
    }

    /// Returns a reference to the current state of the Gateway State Machine.
    pub const fn state(&self) -> &GatewayState {
        &self.state
    }

    /// Returns the deposits that can currently be claimed.
    pub const fn mint_requests(&self) -> &BTreeSet<TxHash> {
        &self.context.mint_requests
    }

    /// Returns the child machine of the given deposit, if it has been spawned.
    pub fn deposit(&self, source_tx_hash: &str) -> Option<&DepositSM> {
        self.context.deposits.get(source_tx_hash)
    }

    /// Returns every spawned child machine, keyed by source transaction hash.
    pub const fn deposits(&self) -> &BTreeMap<TxHash, DepositSM> {
        &self.context.deposits
    }
}
