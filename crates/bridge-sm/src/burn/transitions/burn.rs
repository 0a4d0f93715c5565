use std::sync::Arc;

use ren_gateway_primitives::burn::{BurnTransaction, SubmittedBurn};

use crate::burn::{
    config::BurnSMCfg,
    duties::BurnDuty,
    errors::{BSMError, BSMResult},
    events::BurnEvent,
    machine::{BSMOutput, BurnSM},
    state::BurnState,
};

impl BurnSM {
    /// Processes the restore that decides where the session resumes.
    ///
    /// The guards are evaluated in order: a session whose release was already answered is done,
    /// a session with a known burn resumes settling, and anything else starts from scratch. Both
    /// live paths need a listener in this process.
    pub(crate) fn process_restore(&mut self) -> BSMResult<BSMOutput> {
        if self.state != BurnState::Restoring {
            return Err(BSMError::duplicate(self.state, BurnEvent::Restore));
        }

        if self.tx.is_dest_initiated() {
            self.state = BurnState::DestInitiated;
            return Ok(BSMOutput::new());
        }

        self.state = if self.tx.is_submitted() {
            BurnState::SrcSettling
        } else {
            BurnState::Creating
        };

        Ok(BSMOutput::with_duties(vec![BurnDuty::SpawnListener {
            session: self.tx.clone(),
        }]))
    }

    /// Processes the readiness of the listener.
    ///
    /// The submission is scheduled automatically when configured, or when a burn is already
    /// known and only needs to be resumed.
    pub(crate) fn process_created(&mut self, cfg: Arc<BurnSMCfg>) -> BSMResult<BSMOutput> {
        match self.state {
            BurnState::Creating => {
                self.state = BurnState::Created;

                let resuming = self.tx.transaction.is_some();
                let duties = if cfg.auto_submit() || resuming {
                    vec![BurnDuty::ScheduleSubmit]
                } else {
                    vec![]
                };

                Ok(BSMOutput::with_duties(duties))
            }
            BurnState::SrcSettling => Ok(BSMOutput::with_duties(vec![BurnDuty::ScheduleSubmit])),
            BurnState::Created => Err(BSMError::duplicate(self.state, BurnEvent::Created)),
            _ => Err(BSMError::rejected(
                self.state,
                BurnEvent::Created,
                "no listener is starting",
            )),
        }
    }

    /// Processes a request to submit the burn.
    ///
    /// The listener submits at most once per lifetime, so forwarding a repeated request while
    /// settling is harmless; it lets a restored session resume its burn.
    pub(crate) fn process_submit(&mut self) -> BSMResult<BSMOutput> {
        match self.state {
            BurnState::Created => {
                self.state = BurnState::SubmittingBurn;
                Ok(BSMOutput::with_duties(vec![BurnDuty::SubmitBurn]))
            }
            BurnState::SrcSettling => Ok(BSMOutput::with_duties(vec![BurnDuty::SubmitBurn])),
            BurnState::SubmittingBurn
            | BurnState::SrcConfirmed
            | BurnState::Accepted
            | BurnState::ErrorReleasing => Err(BSMError::duplicate(self.state, BurnEvent::Submit)),
            _ => Err(BSMError::rejected(
                self.state,
                BurnEvent::Submit,
                "listener is not ready",
            )),
        }
    }

    /// Processes the broadcast of the burn.
    pub(crate) fn process_submitted(&mut self, burn: SubmittedBurn) -> BSMResult<BSMOutput> {
        let known = self
            .tx
            .source_tx_hash()
            .is_some_and(|hash| hash == &burn.source_tx_hash);

        match self.state {
            BurnState::SubmittingBurn | BurnState::SrcSettling if known => {
                Err(BSMError::duplicate(self.state, BurnEvent::Submitted { burn }))
            }
            BurnState::SubmittingBurn => {
                self.tx.transaction = Some(BurnTransaction::from(burn));
                Ok(BSMOutput::new())
            }
            BurnState::SrcSettling => Err(BSMError::rejected(
                self.state,
                BurnEvent::Submitted { burn },
                "a different burn is already recorded",
            )),
            _ => Err(BSMError::rejected(
                self.state,
                BurnEvent::Submitted { burn },
                "no burn is being submitted",
            )),
        }
    }

    /// Processes a confirmation report for the burn.
    ///
    /// The first report moves a submitting burn to [`BurnState::SrcSettling`]. Afterwards the
    /// count and target only ever grow, so reports that would not raise either are duplicates.
    pub(crate) fn process_confirmation(&mut self, confs: u64, target: u64) -> BSMResult<BSMOutput> {
        let event = BurnEvent::Confirmation { confs, target };

        let Some(record) = self.tx.transaction.clone() else {
            return Err(match self.state {
                BurnState::SubmittingBurn | BurnState::SrcSettling => BSMError::invalid_event(
                    self.state,
                    event,
                    Some("confirmation for a burn without hash".to_string()),
                ),
                _ => BSMError::rejected(self.state, event, "no burn is being tracked"),
            });
        };

        match self.state {
            BurnState::SubmittingBurn => {
                self.tx.transaction = Some(record.with_confirmations(confs, target));
                self.state = BurnState::SrcSettling;
                Ok(BSMOutput::new())
            }
            BurnState::SrcSettling | BurnState::SrcConfirmed | BurnState::Accepted => {
                if !record.raises_confirmations(confs, target) {
                    return Err(BSMError::duplicate(self.state, event));
                }

                self.tx.transaction = Some(record.with_confirmations(confs, target));
                Ok(BSMOutput::new())
            }
            _ => Err(BSMError::rejected(
                self.state,
                event,
                "no burn is being tracked",
            )),
        }
    }

    /// Processes the report that the burn reached its confirmation target.
    ///
    /// Entering [`BurnState::SrcConfirmed`] requests the release.
    pub(crate) fn process_confirmed(&mut self, confs: u64, target: u64) -> BSMResult<BSMOutput> {
        let event = BurnEvent::Confirmed { confs, target };

        if self.state != BurnState::SrcSettling {
            return Err(BSMError::rejected(
                self.state,
                event,
                "burn is not settling",
            ));
        }

        let Some(record) = self.tx.transaction.clone() else {
            return Err(BSMError::invalid_event(
                self.state,
                event,
                Some("settling session has no burn record".to_string()),
            ));
        };

        self.tx.transaction = Some(record.with_confirmations(confs, target));
        self.state = BurnState::SrcConfirmed;

        Ok(BSMOutput::with_duties(vec![BurnDuty::Release]))
    }

    /// Processes a failure to open or submit the burn. The failure is final for this session.
    pub(crate) fn process_burn_error(&mut self, error: String) -> BSMResult<BSMOutput> {
        match self.state {
            BurnState::Creating
            | BurnState::Created
            | BurnState::SubmittingBurn
            | BurnState::SrcSettling => {
                self.tx = self.tx.clone().with_error(error);
                self.state = BurnState::ErrorBurning;
                Ok(BSMOutput::new())
            }
            _ => Err(BSMError::rejected(
                self.state,
                BurnEvent::BurnError { error },
                "burn is no longer in progress",
            )),
        }
    }
}
