use ren_gateway_primitives::types::{Timestamp, TxHash};

use crate::burn::{
    duties::BurnDuty,
    errors::{BSMError, BSMResult},
    events::BurnEvent,
    machine::{BSMOutput, BurnSM},
    state::BurnState,
};

impl BurnSM {
    /// Processes the protocol's acceptance of the burn.
    pub(crate) fn process_accepted(&mut self, ren_vm_hash: String) -> BSMResult<BSMOutput> {
        match self.state {
            BurnState::SrcConfirmed => {
                let Some(record) = self.tx.transaction.clone() else {
                    return Err(BSMError::invalid_event(
                        self.state,
                        BurnEvent::Accepted { ren_vm_hash },
                        Some("confirmed session has no burn record".to_string()),
                    ));
                };

                self.tx.transaction = Some(record.accept(ren_vm_hash));
                self.state = BurnState::Accepted;

                Ok(BSMOutput::new())
            }
            BurnState::Accepted
                if self
                    .tx
                    .transaction
                    .as_ref()
                    .and_then(|record| record.ren_vm_hash())
                    == Some(ren_vm_hash.as_str()) =>
            {
                Err(BSMError::duplicate(
                    self.state,
                    BurnEvent::Accepted { ren_vm_hash },
                ))
            }
            _ => Err(BSMError::rejected(
                self.state,
                BurnEvent::Accepted { ren_vm_hash },
                "no release is in progress",
            )),
        }
    }

    /// Processes the protocol's answer to the release request.
    ///
    /// The answer must carry the protocol's response. When the release transaction was already
    /// observed the record is completed with the released amount.
    pub(crate) fn process_released(
        &mut self,
        dest_tx_hash: Option<TxHash>,
        ren_response: serde_json::Value,
        dest_tx_amount: Option<String>,
        completed_at: Timestamp,
    ) -> BSMResult<BSMOutput> {
        let event = || BurnEvent::Released {
            dest_tx_hash: dest_tx_hash.clone(),
            ren_response: ren_response.clone(),
            dest_tx_amount: dest_tx_amount.clone(),
            completed_at,
        };

        if self.state != BurnState::Accepted {
            return Err(BSMError::rejected(
                self.state,
                event(),
                "burn has not been accepted",
            ));
        }

        if ren_response.is_null() {
            return Err(BSMError::invalid_event(
                self.state,
                event(),
                Some("release answered without a response".to_string()),
            ));
        }

        let released = self.tx.transaction.clone().map(|record| {
            record.release(
                dest_tx_hash.clone(),
                ren_response.clone(),
                dest_tx_amount.clone().map(|amount| (amount, completed_at)),
            )
        });

        match released {
            Some(Ok(record)) => {
                self.tx.transaction = Some(record);
                self.state = BurnState::DestInitiated;
                Ok(BSMOutput::new())
            }
            Some(Err(record)) => {
                let reason = format!("burn at stage {:?} cannot be released", record.stage());
                Err(BSMError::invalid_event(self.state, event(), Some(reason)))
            }
            None => Err(BSMError::invalid_event(
                self.state,
                event(),
                Some("accepted session has no burn record".to_string()),
            )),
        }
    }

    /// Processes a failed release. The release can be retried.
    pub(crate) fn process_release_error(&mut self, error: String) -> BSMResult<BSMOutput> {
        match self.state {
            BurnState::SrcConfirmed | BurnState::Accepted => {
                self.tx = self.tx.clone().with_error(error);
                self.state = BurnState::ErrorReleasing;
                Ok(BSMOutput::new())
            }
            BurnState::ErrorReleasing => Err(BSMError::duplicate(
                self.state,
                BurnEvent::ReleaseError { error },
            )),
            _ => Err(BSMError::rejected(
                self.state,
                BurnEvent::ReleaseError { error },
                "no release is in progress",
            )),
        }
    }

    /// Processes the user's request to retry a failed release.
    pub(crate) fn process_retry(&mut self) -> BSMResult<BSMOutput> {
        if self.state != BurnState::ErrorReleasing {
            return Err(BSMError::rejected(
                self.state,
                BurnEvent::Retry,
                "no failed release to retry",
            ));
        }

        self.tx.error = None;
        self.state = BurnState::SrcConfirmed;

        Ok(BSMOutput::with_duties(vec![BurnDuty::Release]))
    }
}
