//! The Burn State Machine (BSM).
//!
//! Responsible for driving a burn-and-release session by reacting to the user's commands and the
//! reports of its burn-and-release listener.

use std::sync::Arc;

use ren_gateway_primitives::burn::BurnSession;
use serde::{Deserialize, Serialize};

use crate::{
    burn::{
        config::BurnSMCfg, duties::BurnDuty, errors::BSMError, events::BurnEvent,
        state::BurnState,
    },
    state_machine::{SMOutput, StateMachine},
};

/// The State Machine that drives one burn-and-release session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnSM {
    /// The session record.
    pub tx: BurnSession,
    /// The current state of the Burn State Machine.
    pub state: BurnState,
}

impl StateMachine for BurnSM {
    type Config = Arc<BurnSMCfg>;
    type Duty = BurnDuty;
    type OutgoingSignal = std::convert::Infallible;
    type Event = BurnEvent;
    type Error = BSMError;

    fn process_event(
        &mut self,
        cfg: Self::Config,
        event: Self::Event,
    ) -> Result<SMOutput<Self::Duty, Self::OutgoingSignal>, Self::Error> {
        if self.state.is_terminal() {
            return Err(BSMError::rejected(
                self.state,
                event,
                "session is in a terminal state",
            ));
        }

        match event {
            BurnEvent::Restore => self.process_restore(),
            BurnEvent::Created => self.process_created(cfg),
            BurnEvent::Submit => self.process_submit(),
            BurnEvent::Submitted { burn } => self.process_submitted(burn),
            BurnEvent::Confirmation { confs, target } => self.process_confirmation(confs, target),
            BurnEvent::Confirmed { confs, target } => self.process_confirmed(confs, target),
            BurnEvent::Accepted { ren_vm_hash } => self.process_accepted(ren_vm_hash),
            BurnEvent::Released {
                dest_tx_hash,
                ren_response,
                dest_tx_amount,
                completed_at,
            } => self.process_released(dest_tx_hash, ren_response, dest_tx_amount, completed_at),
            BurnEvent::BurnError { error } => self.process_burn_error(error),
            BurnEvent::ReleaseError { error } => self.process_release_error(error),
            BurnEvent::Retry => self.process_retry(),
        }
    }
}

/// The output of the Burn State Machine after processing an event.
pub type BSMOutput = SMOutput<BurnDuty, std::convert::Infallible>;

impl BurnSM {
    /// Creates a new [`BurnSM`] for the given session, starting in [`BurnState::Restoring`].
    pub const fn new(tx: BurnSession) -> Self {
        Self {
            tx,
            state: BurnState::Restoring,
        }
    }

    /// Returns a reference to the session record.
    pub const fn tx(&self) -> &BurnSession {
        &self.tx
    }

    /// Returns a reference to the current state of the Burn State Machine.
    pub const fn state(&self) -> &BurnState {
        &self.state
    }
}
