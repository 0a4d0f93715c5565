use ren_gateway_primitives::deposit::DepositTransaction;

use crate::{
    deposit::{
        errors::{DSMError, DSMResult},
        events::DepositEvent,
        machine::{DSMOutput, DepositSM},
        state::DepositState,
    },
    signals::DepositToGateway,
};

/// Where a fully restored deposit resumes, ordered from the most to the least advanced state.
///
/// The first guard that holds decides the state, so a deposit resumes at the farthest point it
/// legitimately qualifies for. A record that satisfies none of them is still settling.
const RESTORE_PRIORITY: [(fn(&DepositTransaction) -> bool, DepositState); 3] = [
    (DepositTransaction::is_completed, DepositState::Completed),
    (DepositTransaction::is_accepted, DepositState::Accepted),
    (DepositTransaction::is_settled, DepositState::SrcConfirmed),
];

/// Returns the state a fully restored deposit resumes in.
pub(crate) fn restored_state(record: &DepositTransaction) -> DepositState {
    RESTORE_PRIORITY
        .iter()
        .find(|(guard, _)| guard(record))
        .map_or(DepositState::SrcSettling, |(_, state)| *state)
}

impl DepositSM {
    /// Processes the completion check that is delivered right after the machine is spawned.
    ///
    /// A deposit that already completed in an earlier run skips straight to
    /// [`DepositState::Completed`]; everything else asks the gateway for restoration data.
    pub(crate) fn process_check(&mut self) -> DSMResult<DSMOutput> {
        match self.state {
            DepositState::CheckingCompletion if self.record.is_completed() => {
                let signals = self.enter(DepositState::Completed);
                Ok(DSMOutput::with_signals(signals))
            }
            DepositState::CheckingCompletion => {
                self.state = DepositState::RestoringDeposit;

                Ok(DSMOutput::with_signals(vec![
                    DepositToGateway::RequestRestore {
                        deposit: self.record.clone(),
                    }
                    .into(),
                ]))
            }
            _ => Err(DSMError::duplicate(self.state, DepositEvent::Check)),
        }
    }

    /// Processes a restore payload.
    ///
    /// Every payload is merged into the record. A final payload resumes the deposit in the state
    /// picked by [`restored_state`].
    pub(crate) fn process_restored(
        &mut self,
        deposit: DepositTransaction,
        is_final: bool,
    ) -> DSMResult<DSMOutput> {
        if self.state != DepositState::RestoringDeposit {
            return Err(DSMError::rejected(
                self.state,
                DepositEvent::Restored { deposit, is_final },
                "deposit is not restoring",
            ));
        }

        if deposit.source_tx_hash() != self.source_tx_hash() {
            let reason = format!(
                "restore payload for {} delivered to deposit {}",
                deposit.source_tx_hash(),
                self.source_tx_hash()
            );
            return Err(DSMError::invalid_event(
                self.state,
                DepositEvent::Restored { deposit, is_final },
                Some(reason),
            ));
        }

        let merged = self.record.clone().merge(deposit.clone());

        if !is_final {
            if merged == self.record {
                return Err(DSMError::duplicate(
                    self.state,
                    DepositEvent::Restored { deposit, is_final },
                ));
            }

            self.record = merged;
            return Ok(DSMOutput::with_signals(vec![self.update()]));
        }

        self.record = merged;
        let next = restored_state(&self.record);

        let mut signals = Vec::new();
        if !matches!(next, DepositState::Completed) {
            signals.push(self.update());
        }
        signals.extend(self.enter(next));

        Ok(DSMOutput::with_signals(signals))
    }

    /// Processes a failure reported while restoring or watching the deposit.
    ///
    /// While settling the error is only recorded, since the watch may still recover.
    pub(crate) fn process_error(&mut self, error: String) -> DSMResult<DSMOutput> {
        match self.state {
            DepositState::RestoringDeposit => {
                self.record = self.record.clone().with_error(Some(error));
                let mut signals = vec![self.update()];
                signals.extend(self.enter(DepositState::ErrorRestoring));

                Ok(DSMOutput::with_signals(signals))
            }
            DepositState::SrcSettling => {
                if self.record.error() == Some(error.as_str()) {
                    return Err(DSMError::duplicate(
                        self.state,
                        DepositEvent::Error { error },
                    ));
                }

                self.record = self.record.clone().with_error(Some(error));
                Ok(DSMOutput::with_signals(vec![self.update()]))
            }
            _ => Err(DSMError::rejected(
                self.state,
                DepositEvent::Error { error },
                "no restore or watch is in progress",
            )),
        }
    }
}
