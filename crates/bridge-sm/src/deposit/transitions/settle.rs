use ren_gateway_primitives::deposit::DepositTransaction;

use crate::deposit::{
    errors::{DSMError, DSMResult},
    events::DepositEvent,
    machine::{DSMOutput, DepositSM},
    state::DepositState,
};

impl DepositSM {
    /// Processes a confirmation report from the source chain.
    ///
    /// The count and target only ever grow, so a report that would not raise either is a
    /// duplicate. Reports keep being recorded after the deposit settled. A settling deposit that
    /// reaches its target moves to [`DepositState::SrcConfirmed`].
    pub(crate) fn process_confirmation(
        &mut self,
        confs: u64,
        target: Option<u64>,
    ) -> DSMResult<DSMOutput> {
        if matches!(
            self.state,
            DepositState::CheckingCompletion | DepositState::RestoringDeposit
        ) {
            return Err(DSMError::rejected(
                self.state,
                DepositEvent::Confirmation { confs, target },
                "deposit has not been restored yet",
            ));
        }

        if !self.record.raises_confirmations(confs, target) {
            return Err(DSMError::duplicate(
                self.state,
                DepositEvent::Confirmation { confs, target },
            ));
        }

        self.record = self.record.clone().with_confirmations(confs, target);

        let mut signals = vec![self.update()];
        if self.state == DepositState::SrcSettling && self.record.is_settled() {
            signals.extend(self.enter(DepositState::SrcConfirmed));
        }

        Ok(DSMOutput::with_signals(signals))
    }

    /// Processes the report that the deposit reached its confirmation target.
    pub(crate) fn process_confirmed(&mut self, confs: u64, target: u64) -> DSMResult<DSMOutput> {
        match self.state {
            DepositState::SrcSettling => {
                self.record = self.record.clone().with_confirmations(confs, Some(target));

                let mut signals = vec![self.update()];
                signals.extend(self.enter(DepositState::SrcConfirmed));

                Ok(DSMOutput::with_signals(signals))
            }
            DepositState::SrcConfirmed
            | DepositState::Accepted
            | DepositState::Claiming
            | DepositState::ErrorSubmitting
            | DepositState::DestInitiated => Err(DSMError::duplicate(
                self.state,
                DepositEvent::Confirmed { confs, target },
            )),
            _ => Err(DSMError::rejected(
                self.state,
                DepositEvent::Confirmed { confs, target },
                "deposit has not been restored yet",
            )),
        }
    }

    /// Processes the protocol's signature for the deposit.
    pub(crate) fn process_signed(
        &mut self,
        ren_vm_hash: String,
        ren_signature: String,
    ) -> DSMResult<DSMOutput> {
        let event = || DepositEvent::Signed {
            ren_vm_hash: ren_vm_hash.clone(),
            ren_signature: ren_signature.clone(),
        };

        match self.state {
            DepositState::SrcConfirmed => {
                let confirming = match self.record.clone() {
                    DepositTransaction::Detected(detected) => detected.confirming(0, None),
                    DepositTransaction::Confirming(confirming) => confirming,
                    // stored acceptance without a signature
                    DepositTransaction::Accepted(accepted) => accepted.confirming,
                    _ => return Err(DSMError::duplicate(self.state, event())),
                };

                self.record = confirming
                    .accept(ren_vm_hash.clone(), ren_signature.clone())
                    .into();

                let mut signals = vec![self.update()];
                signals.extend(self.enter(DepositState::Accepted));

                Ok(DSMOutput::with_signals(signals))
            }
            DepositState::Accepted
            | DepositState::Claiming
            | DepositState::ErrorSubmitting
            | DepositState::DestInitiated => Err(DSMError::duplicate(self.state, event())),
            _ => Err(DSMError::rejected(
                self.state,
                event(),
                "deposit is not waiting for a signature",
            )),
        }
    }

    /// Processes a failure of the protocol to sign the deposit.
    pub(crate) fn process_sign_error(&mut self, error: String) -> DSMResult<DSMOutput> {
        if self.state != DepositState::SrcConfirmed {
            return Err(DSMError::rejected(
                self.state,
                DepositEvent::SignError { error },
                "deposit is not waiting for a signature",
            ));
        }

        self.record = self.record.clone().with_error(Some(error));

        let mut signals = vec![self.update()];
        signals.extend(self.enter(DepositState::ErrorAccepting));

        Ok(DSMOutput::with_signals(signals))
    }

    /// Processes a revert of the deposit on the source chain.
    ///
    /// A revert is definitive: the deposit moves to [`DepositState::Rejected`] and is no longer
    /// claimable.
    pub(crate) fn process_reverted(&mut self, reason: String) -> DSMResult<DSMOutput> {
        match self.state {
            DepositState::SrcSettling | DepositState::SrcConfirmed => {
                self.record = self.record.clone().with_error(Some(reason));
                let signals = self.enter(DepositState::Rejected);

                Ok(DSMOutput::with_signals(signals))
            }
            _ => Err(DSMError::rejected(
                self.state,
                DepositEvent::Reverted { reason },
                "deposit is no longer settling",
            )),
        }
    }
}
