use ren_gateway_primitives::{
    deposit::DepositTransaction,
    types::{CustomParams, Timestamp, TxHash},
};

use crate::{
    deposit::{
        errors::{DSMError, DSMResult},
        events::DepositEvent,
        machine::{DSMOutput, DepositSM},
        state::DepositState,
    },
    signals::DepositToGateway,
};

impl DepositSM {
    /// Processes the user's claim of an accepted deposit.
    ///
    /// The destination-call parameters are merged into the record and the gateway is asked to
    /// submit the mint. A claim after a failed submission clears the previous error.
    pub(crate) fn process_claim(&mut self, params: CustomParams) -> DSMResult<DSMOutput> {
        match self.state {
            DepositState::Accepted | DepositState::ErrorSubmitting => {
                let submitting = match self
                    .record
                    .clone()
                    .with_error(None)
                    .into_submitting(params.clone())
                {
                    Ok(submitting) => submitting,
                    Err(record) => {
                        let reason = format!("record at stage {:?} cannot be claimed", record.stage());
                        return Err(DSMError::invalid_event(
                            self.state,
                            DepositEvent::Claim { params },
                            Some(reason),
                        ));
                    }
                };

                self.record = submitting.clone().into();
                self.state = DepositState::Claiming;

                Ok(DSMOutput::with_signals(vec![
                    self.update(),
                    DepositToGateway::Mint {
                        deposit: submitting,
                    }
                    .into(),
                ]))
            }
            DepositState::Claiming => Err(DSMError::duplicate(
                self.state,
                DepositEvent::Claim { params },
            )),
            _ => Err(DSMError::rejected(
                self.state,
                DepositEvent::Claim { params },
                "deposit is not claimable",
            )),
        }
    }

    /// Processes the user's rejection of a claimable deposit.
    pub(crate) fn process_reject(&mut self) -> DSMResult<DSMOutput> {
        match self.state {
            DepositState::Accepted | DepositState::ErrorSubmitting => {
                let signals = self.enter(DepositState::Rejected);
                Ok(DSMOutput::with_signals(signals))
            }
            _ => Err(DSMError::rejected(
                self.state,
                DepositEvent::Reject,
                "deposit is not claimable",
            )),
        }
    }

    /// Processes the broadcast of the mint on the destination chain.
    pub(crate) fn process_submitted(
        &mut self,
        dest_tx_hash: TxHash,
        dest_tx_amount: Option<String>,
    ) -> DSMResult<DSMOutput> {
        let event = || DepositEvent::Submitted {
            dest_tx_hash: dest_tx_hash.clone(),
            dest_tx_amount: dest_tx_amount.clone(),
        };

        match self.state {
            DepositState::Claiming => {
                let DepositTransaction::Submitting(submitting) = self.record.clone() else {
                    let reason = format!(
                        "claiming deposit holds a record at stage {:?}",
                        self.record.stage()
                    );
                    return Err(DSMError::invalid_event(self.state, event(), Some(reason)));
                };

                self.record = submitting
                    .mint(dest_tx_hash.clone(), dest_tx_amount.clone())
                    .into();
                self.state = DepositState::DestInitiated;

                Ok(DSMOutput::with_signals(vec![self.update()]))
            }
            DepositState::DestInitiated
                if self
                    .record
                    .minted()
                    .is_some_and(|minted| minted.dest_tx_hash == dest_tx_hash) =>
            {
                Err(DSMError::duplicate(self.state, event()))
            }
            _ => Err(DSMError::rejected(
                self.state,
                event(),
                "no mint submission is in progress",
            )),
        }
    }

    /// Processes a failed mint submission.
    ///
    /// The deposit becomes claimable again so that the user can retry the claim. This also
    /// applies after the mint was broadcast, in case the destination chain reverted it.
    pub(crate) fn process_submit_error(&mut self, error: String) -> DSMResult<DSMOutput> {
        match self.state {
            DepositState::Claiming | DepositState::DestInitiated => {
                self.record = self.record.clone().with_error(Some(error));

                let mut signals = vec![self.update()];
                signals.extend(self.enter(DepositState::ErrorSubmitting));

                Ok(DSMOutput::with_signals(signals))
            }
            DepositState::ErrorSubmitting => Err(DSMError::duplicate(
                self.state,
                DepositEvent::SubmitError { error },
            )),
            _ => Err(DSMError::rejected(
                self.state,
                DepositEvent::SubmitError { error },
                "no mint submission is in progress",
            )),
        }
    }

    /// Processes the acknowledgement of the mint result.
    pub(crate) fn process_acknowledge(&mut self, at: Timestamp) -> DSMResult<DSMOutput> {
        if self.state != DepositState::DestInitiated {
            return Err(DSMError::rejected(
                self.state,
                DepositEvent::Acknowledge { at },
                "mint has not been broadcast",
            ));
        }

        let DepositTransaction::Minted(minted) = self.record.clone() else {
            let reason = format!(
                "broadcast deposit holds a record at stage {:?}",
                self.record.stage()
            );
            return Err(DSMError::invalid_event(
                self.state,
                DepositEvent::Acknowledge { at },
                Some(reason),
            ));
        };

        self.record = minted.complete(at).into();
        let signals = self.enter(DepositState::Completed);

        Ok(DSMOutput::with_signals(signals))
    }
}
