use ren_gateway_primitives::{session::GatewaySession, types::Timestamp};

use crate::gateway::{
    duties::GatewayDuty,
    errors::{GSMError, GSMResult},
    events::GatewayEvent,
    machine::{GSMOutput, GatewaySM},
    state::GatewayState,
};

impl GatewaySM {
    /// Processes the restore that decides where the session resumes.
    ///
    /// The guards are evaluated in order: an expired session completes even if it was already
    /// opened, an opened session resumes listening, and anything else allocates an address.
    pub(crate) fn process_restore(&mut self, now: Timestamp) -> GSMResult<GSMOutput> {
        if self.state != GatewayState::Restoring {
            return Err(GSMError::duplicate(
                self.state,
                GatewayEvent::Restore { now },
            ));
        }

        if self.context.tx.is_expired(now) {
            self.state = GatewayState::Completed;
            return Ok(GSMOutput::new());
        }

        if self.context.tx.is_opened() {
            self.state = GatewayState::Listening;
            return Ok(GSMOutput::with_duties(vec![GatewayDuty::WatchDeposits {
                session: self.context.tx.clone(),
            }]));
        }

        self.state = GatewayState::Creating;
        Ok(GSMOutput::with_duties(vec![
            GatewayDuty::CreateGatewayAddress {
                session: self.context.tx.clone(),
            },
        ]))
    }

    /// Processes the allocation of the deposit address.
    ///
    /// The session returned by the source chain replaces the current one.
    pub(crate) fn process_gateway_created(
        &mut self,
        session: GatewaySession,
    ) -> GSMResult<GSMOutput> {
        match self.state {
            GatewayState::Creating => {
                if session.id != self.context.tx.id {
                    let reason = format!(
                        "address allocated for session {} instead of {}",
                        session.id, self.context.tx.id
                    );
                    return Err(GSMError::invalid_event(
                        self.state,
                        GatewayEvent::GatewayCreated { session },
                        Some(reason),
                    ));
                }

                if !session.is_opened() {
                    return Err(GSMError::invalid_event(
                        self.state,
                        GatewayEvent::GatewayCreated { session },
                        Some("allocated session carries no deposit address".to_string()),
                    ));
                }

                self.context.tx = session;
                self.state = GatewayState::Listening;

                Ok(GSMOutput::with_duties(vec![GatewayDuty::WatchDeposits {
                    session: self.context.tx.clone(),
                }]))
            }
            GatewayState::Listening => Err(GSMError::duplicate(
                self.state,
                GatewayEvent::GatewayCreated { session },
            )),
            _ => Err(GSMError::rejected(
                self.state,
                GatewayEvent::GatewayCreated { session },
                "no address allocation is in progress",
            )),
        }
    }

    /// Processes a failed address allocation. The failure is final for this session.
    pub(crate) fn process_gateway_creation_failed(
        &mut self,
        error: String,
    ) -> GSMResult<GSMOutput> {
        if self.state != GatewayState::Creating {
            return Err(GSMError::rejected(
                self.state,
                GatewayEvent::GatewayCreationFailed { error },
                "no address allocation is in progress",
            ));
        }

        self.context.tx = self.context.tx.clone().with_error(error);
        self.state = GatewayState::SrcInitializeError;

        Ok(GSMOutput::new())
    }

    /// Processes a failure of the deposit watch.
    pub(crate) fn process_watch_failed(&mut self, error: String) -> GSMResult<GSMOutput> {
        if self.state != GatewayState::Listening {
            return Err(GSMError::rejected(
                self.state,
                GatewayEvent::WatchFailed { error },
                "session is not listening",
            ));
        }

        self.context.tx = self.context.tx.clone().with_error(error);
        self.state = GatewayState::SrcInitializeError;

        Ok(GSMOutput::with_duties(vec![GatewayDuty::CancelWatch]))
    }

    /// Processes the expiry of the session.
    ///
    /// A listening session releases its watches on the way out. A session still allocating its
    /// address completes as well, dropping whatever the allocation returns later.
    pub(crate) fn process_expired(&mut self) -> GSMResult<GSMOutput> {
        match self.state {
            GatewayState::Listening => {
                self.state = GatewayState::Completed;
                Ok(GSMOutput::with_duties(vec![GatewayDuty::CancelWatch]))
            }
            // The expiry timer fires once. If it fires while the address is still being
            // allocated the session would otherwise wait forever, so it completes here and a
            // late allocation is rejected.
            GatewayState::Creating => {
                self.state = GatewayState::Completed;
                Ok(GSMOutput::new())
            }
            _ => Err(GSMError::rejected(
                self.state,
                GatewayEvent::Expired,
                "session has not been restored yet",
            )),
        }
    }
}
