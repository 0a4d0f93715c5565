//! Spawning the deposit children and routing events and signals between them and the gateway.

use ren_gateway_primitives::{deposit::DepositTransaction, types::TxHash};

use crate::{
    deposit::{
        errors::DSMError, events::DepositEvent, machine::DepositSM, state::DepositState,
    },
    gateway::{
        duties::GatewayDuty,
        errors::{GSMError, GSMResult},
        events::GatewayEvent,
        machine::{GSMOutput, GatewaySM},
        state::GatewayState,
    },
    signals::{DepositSignal, DepositToGateway},
    state_machine::StateMachine,
};

impl GatewaySM {
    /// Spawns a child for every recorded deposit that does not have one yet.
    ///
    /// This is how a persisted session picks its deposits back up once the deposit watch runs.
    pub(crate) fn process_listener_ready(&mut self) -> GSMResult<GSMOutput> {
        if self.state != GatewayState::Listening {
            return Err(GSMError::rejected(
                self.state,
                GatewayEvent::ListenerReady,
                "session is not listening",
            ));
        }

        let pending: Vec<DepositTransaction> = self
            .context
            .tx
            .transactions
            .iter()
            .filter(|(hash, _)| !self.context.deposits.contains_key(*hash))
            .map(|(_, record)| record.clone())
            .collect();

        if pending.is_empty() {
            return Err(GSMError::duplicate(self.state, GatewayEvent::ListenerReady));
        }

        let mut duties = Vec::new();
        for record in pending {
            let hash = record.source_tx_hash().clone();
            let spawned = self
                .spawn(record)
                .map_err(|err| self.child_error(GatewayEvent::ListenerReady, &hash, err))?;
            duties.extend(spawned);
        }

        Ok(GSMOutput::with_duties(duties))
    }

    /// Processes a deposit found by the deposit watch.
    ///
    /// A deposit that already has a child is not spawned again. A previously recorded deposit is
    /// merged with the new data before its child starts.
    pub(crate) fn process_deposit_detected(
        &mut self,
        deposit: DepositTransaction,
    ) -> GSMResult<GSMOutput> {
        if self.state != GatewayState::Listening {
            return Err(GSMError::rejected(
                self.state,
                GatewayEvent::DepositDetected { deposit },
                "session is not listening",
            ));
        }

        let hash = deposit.source_tx_hash().clone();
        if self.context.deposits.contains_key(&hash) {
            return Err(GSMError::duplicate(
                self.state,
                GatewayEvent::DepositDetected { deposit },
            ));
        }

        let record = self.merged_with_recorded(deposit.clone());
        let duties = self
            .spawn(record)
            .map_err(|err| self.child_error(GatewayEvent::DepositDetected { deposit }, &hash, err))?;

        Ok(GSMOutput::with_duties(duties))
    }

    /// Processes stored or chain data for a deposit.
    ///
    /// Data for a deposit with a running child is forwarded to it unchanged. Otherwise the data
    /// is merged into the session record and a child is spawned for it; a final payload then
    /// resumes that child.
    pub(crate) fn process_deposit_restored(
        &mut self,
        deposit: DepositTransaction,
        is_final: bool,
    ) -> GSMResult<GSMOutput> {
        let event = || GatewayEvent::DepositRestored {
            deposit: deposit.clone(),
            is_final,
        };

        if self.state != GatewayState::Listening {
            return Err(GSMError::rejected(
                self.state,
                event(),
                "session is not listening",
            ));
        }

        let hash = deposit.source_tx_hash().clone();
        let restored = DepositEvent::Restored {
            deposit: deposit.clone(),
            is_final,
        };

        if let Some(child) = self.context.deposits.get(&hash).cloned() {
            let duties = self
                .drive_child(child, restored)
                .map_err(|err| self.child_error(event(), &hash, err))?;

            return Ok(GSMOutput::with_duties(duties));
        }

        let record = self.merged_with_recorded(deposit.clone());
        let mut duties = self
            .spawn(record)
            .map_err(|err| self.child_error(event(), &hash, err))?;

        // the payload is already part of the child's record
        duties.retain(|duty| {
            !matches!(duty, GatewayDuty::RestoreDeposit { deposit } if deposit.source_tx_hash() == &hash)
        });

        let resumable = self
            .context
            .deposits
            .get(&hash)
            .filter(|child| is_final && child.state() == &DepositState::RestoringDeposit)
            .cloned();

        if let Some(child) = resumable {
            let resumed = self
                .drive_child(child, restored)
                .map_err(|err| self.child_error(event(), &hash, err))?;
            duties.extend(resumed);
        }

        Ok(GSMOutput::with_duties(duties))
    }

    /// Delivers an event to the child of the given deposit.
    pub(crate) fn process_to_deposit(
        &mut self,
        source_tx_hash: TxHash,
        event: DepositEvent,
    ) -> GSMResult<GSMOutput> {
        let gateway_event = || GatewayEvent::ToDeposit {
            source_tx_hash: source_tx_hash.clone(),
            event: event.clone(),
        };

        if self.state != GatewayState::Listening {
            return Err(GSMError::rejected(
                self.state,
                gateway_event(),
                "session is not listening",
            ));
        }

        let Some(child) = self.context.deposits.get(&source_tx_hash).cloned() else {
            return Err(GSMError::rejected(
                self.state,
                gateway_event(),
                "no such deposit in this session",
            ));
        };

        let duties = self
            .drive_child(child, event.clone())
            .map_err(|err| self.child_error(gateway_event(), &source_tx_hash, err))?;

        Ok(GSMOutput::with_duties(duties))
    }

    /// Returns `deposit` merged with the record already stored for it, if any.
    fn merged_with_recorded(&self, deposit: DepositTransaction) -> DepositTransaction {
        match self.context.tx.transaction(deposit.source_tx_hash()) {
            Some(recorded) => recorded.clone().merge(deposit),
            None => deposit,
        }
    }

    /// Spawns a child for the record and runs its completion check.
    fn spawn(&mut self, record: DepositTransaction) -> Result<Vec<GatewayDuty>, DSMError> {
        self.drive_child(DepositSM::new(record), DepositEvent::Check)
    }

    /// Runs `event` through `child` and stores the child only if it accepted the event.
    ///
    /// The child's signals are then handled in order. A child that ends after its confirmation
    /// watch may have started also gets that watch cancelled.
    fn drive_child(
        &mut self,
        mut child: DepositSM,
        event: DepositEvent,
    ) -> Result<Vec<GatewayDuty>, DSMError> {
        let previous_state = *child.state();
        let output = child.process_event((), event)?;
        let child_state = *child.state();
        let source_tx_hash = child.source_tx_hash().clone();

        self.context.deposits.insert(source_tx_hash.clone(), child);

        let mut duties = Vec::new();
        for signal in output.signals {
            duties.extend(self.handle_deposit_signal(signal, child_state));
        }

        if may_watch_confirmations(previous_state) && child_state.is_terminal() {
            duties.push(GatewayDuty::CancelConfirmations { source_tx_hash });
        }

        Ok(duties)
    }

    /// Applies one signal of a child whose state after the event is `child_state`.
    fn handle_deposit_signal(
        &mut self,
        signal: DepositSignal,
        child_state: DepositState,
    ) -> Option<GatewayDuty> {
        let DepositSignal::ToGateway(signal) = signal;

        match signal {
            DepositToGateway::RequestRestore { deposit } => {
                self.context.tx.upsert_transaction(deposit.clone());
                Some(GatewayDuty::RestoreDeposit { deposit })
            }
            DepositToGateway::Settle { deposit } => {
                self.context.tx.upsert_transaction(deposit.clone());
                Some(GatewayDuty::WatchConfirmations { deposit })
            }
            DepositToGateway::Sign { deposit } => {
                self.context.tx.upsert_transaction(deposit.clone());
                Some(GatewayDuty::RequestSignature { deposit })
            }
            DepositToGateway::Claimable { deposit } => {
                self.context
                    .mint_requests
                    .insert(deposit.source_tx_hash().clone());
                self.context.tx.upsert_transaction(deposit);
                None
            }
            DepositToGateway::Mint { deposit } => Some(GatewayDuty::SubmitMint { deposit }),
            DepositToGateway::Update { deposit } => {
                // a failed submission keeps the deposit claimable
                let minted = deposit.is_minted() && child_state != DepositState::ErrorSubmitting;
                if minted || child_state == DepositState::Rejected {
                    self.context.mint_requests.remove(deposit.source_tx_hash());
                }

                self.context.tx.upsert_transaction(deposit);
                None
            }
        }
    }

    /// Lifts a child's error into a gateway error for `event`.
    ///
    /// Duplicates stay duplicates. Anything else a child refuses, including a contract violation,
    /// only concerns that deposit and is reported as a rejection so siblings are unaffected.
    fn child_error(&self, event: GatewayEvent, source_tx_hash: &str, err: DSMError) -> GSMError {
        match err {
            DSMError::Duplicate { .. } => GSMError::duplicate(self.state, event),
            other => GSMError::rejected(
                self.state,
                event,
                format!("deposit {source_tx_hash}: {other}"),
            ),
        }
    }
}

/// Whether a confirmation watch can be running for a child in `state`.
///
/// The watch starts when the deposit settles and keeps reporting after that.
const fn may_watch_confirmations(state: DepositState) -> bool {
    matches!(
        state,
        DepositState::SrcSettling
            | DepositState::SrcConfirmed
            | DepositState::Accepted
            | DepositState::Claiming
            | DepositState::ErrorSubmitting
            | DepositState::DestInitiated
    )
}
