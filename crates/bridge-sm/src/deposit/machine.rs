//! The Deposit State Machine (DSM).
//!
//! Responsible for driving a single deposit by reacting to events and reporting its progress to
//! the owning gateway through signals.

use std::convert::Infallible;

use ren_gateway_primitives::{deposit::DepositTransaction, types::TxHash};
use serde::{Deserialize, Serialize};

use crate::{
    deposit::{errors::DSMError, events::DepositEvent, state::DepositState},
    signals::{DepositSignal, DepositToGateway},
    state_machine::{SMOutput, StateMachine},
};

/// The State Machine that tracks one deposit of a mint session.
///
/// The machine is the sole authority for its record: the gateway only ever copies the record a
/// child reports through [`DepositToGateway::Update`] and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositSM {
    /// The deposit record owned by this machine.
    pub record: DepositTransaction,
    /// The current state of the Deposit State Machine.
    pub state: DepositState,
}

impl StateMachine for DepositSM {
    type Config = ();
    type Duty = Infallible;
    type OutgoingSignal = DepositSignal;
    type Event = DepositEvent;
    type Error = DSMError;

    fn process_event(
        &mut self,
        _cfg: Self::Config,
        event: Self::Event,
    ) -> Result<SMOutput<Self::Duty, Self::OutgoingSignal>, Self::Error> {
        if self.state.is_terminal() {
            return Err(DSMError::rejected(
                self.state,
                event,
                "deposit is in a terminal state",
            ));
        }

        match event {
            DepositEvent::Check => self.process_check(),
            DepositEvent::Restored { deposit, is_final } => {
                self.process_restored(deposit, is_final)
            }
            DepositEvent::Error { error } => self.process_error(error),
            DepositEvent::Confirmation { confs, target } => {
                self.process_confirmation(confs, target)
            }
            DepositEvent::Confirmed { confs, target } => self.process_confirmed(confs, target),
            DepositEvent::Signed {
                ren_vm_hash,
                ren_signature,
            } => self.process_signed(ren_vm_hash, ren_signature),
            DepositEvent::SignError { error } => self.process_sign_error(error),
            DepositEvent::Reverted { reason } => self.process_reverted(reason),
            DepositEvent::Claim { params } => self.process_claim(params),
            DepositEvent::Reject => self.process_reject(),
            DepositEvent::Submitted {
                dest_tx_hash,
                dest_tx_amount,
            } => self.process_submitted(dest_tx_hash, dest_tx_amount),
            DepositEvent::SubmitError { error } => self.process_submit_error(error),
            DepositEvent::Acknowledge { at } => self.process_acknowledge(at),
        }
    }
}

/// The output of the Deposit State Machine after processing an event.
///
/// The Deposit SM never emits duties of its own; everything it needs is requested from the
/// gateway through [`DepositSignal`]s.
pub type DSMOutput = SMOutput<Infallible, DepositSignal>;

impl DepositSM {
    /// Creates a new [`DepositSM`] for the given record, starting in
    /// [`DepositState::CheckingCompletion`].
    pub const fn new(record: DepositTransaction) -> Self {
        Self {
            record,
            state: DepositState::CheckingCompletion,
        }
    }

    /// Returns a reference to the deposit record.
    pub const fn record(&self) -> &DepositTransaction {
        &self.record
    }

    /// Returns a reference to the current state of the Deposit State Machine.
    pub const fn state(&self) -> &DepositState {
        &self.state
    }

    /// Returns the hash that identifies this deposit.
    pub const fn source_tx_hash(&self) -> &TxHash {
        self.record.source_tx_hash()
    }

    /// Moves to `state` and returns the signals emitted on entering it.
    pub(crate) fn enter(&mut self, state: DepositState) -> Vec<DepositSignal> {
        self.state = state;

        let deposit = self.record.clone();
        let signal = match state {
            DepositState::SrcSettling => Some(DepositToGateway::Settle { deposit }),
            DepositState::SrcConfirmed => Some(DepositToGateway::Sign { deposit }),
            DepositState::Accepted | DepositState::ErrorSubmitting => {
                Some(DepositToGateway::Claimable { deposit })
            }
            DepositState::Completed | DepositState::Rejected => {
                Some(DepositToGateway::Update { deposit })
            }
            _ => None,
        };

        signal.into_iter().map(DepositSignal::from).collect()
    }

    /// Reports the current record to the gateway.
    pub(crate) fn update(&self) -> DepositSignal {
        DepositToGateway::Update {
            deposit: self.record.clone(),
        }
        .into()
    }
}
