//! The driver of burn-and-release sessions.
//!
//! A driver owns one [`BurnSM`] and feeds it one event at a time: the reports of its
//! burn-and-release listener and the commands sent through its [`BurnHandle`]. Burn sessions do
//! not expire.

use std::{sync::Arc, time::Duration};

use ren_gateway_exec::config::ExecutionConfig;
use ren_gateway_params::SessionParams;
use ren_gateway_sm::{
    burn::{config::BurnSMCfg, events::BurnEvent, machine::BurnSM},
    state_machine::StateMachine,
};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, trace};

use crate::{
    context::BurnContext,
    duty_dispatcher::BurnDutyDispatcher,
    errors::{DriverError, ProcessError},
    events_mux::{EventsMux, SessionInput},
    handle::BurnHandle,
};

/// Starts a burn-and-release session on the current tokio runtime.
///
/// A session whose record already carries a burn resumes tracking it instead of burning again.
/// The returned task resolves to the last snapshot of the machine when the session reaches a
/// terminal state or is shut down through its handle, and to an error if the protocol breaks its
/// contract with the session.
pub fn start_burn(
    ctx: BurnContext,
    params: SessionParams,
) -> (BurnHandle, JoinHandle<Result<BurnSM, DriverError>>) {
    let output_handles = Arc::new(ctx.output_handles());
    let cfg = Arc::new(BurnSMCfg {
        auto_submit: ctx.auto_submit,
    });
    let sm = BurnSM::new(ctx.session);
    let session_id = sm.tx().id.clone();

    let (outbox, outbox_rx) = mpsc::unbounded_channel();
    let (failures, failures_rx) = mpsc::unbounded_channel();
    let (controls, controls_rx) = mpsc::unbounded_channel();
    let (snapshots, snapshots_rx) = watch::channel(sm.clone());
    let shutdown = CancellationToken::new();

    let mux = EventsMux {
        failures_rx,
        outbox_rx,
        shutdown: shutdown.clone(),
        controls_rx,
        expiry: None,
    };
    let dispatcher = BurnDutyDispatcher::new(
        Arc::new(ExecutionConfig::from(&params)),
        output_handles,
        outbox,
        failures,
        CancellationToken::new(),
    );

    let driver = BurnDriver {
        cfg,
        sm,
        mux,
        dispatcher,
        snapshots,
        shutdown_timeout: params.shutdown_timeout(),
    };
    let handle = BurnHandle::new(session_id, controls, snapshots_rx, shutdown);

    (handle, tokio::spawn(driver.run()))
}

#[derive(Debug)]
struct BurnDriver {
    cfg: Arc<BurnSMCfg>,
    sm: BurnSM,
    mux: EventsMux<BurnEvent>,
    dispatcher: BurnDutyDispatcher,
    snapshots: watch::Sender<BurnSM>,
    shutdown_timeout: Duration,
}

impl BurnDriver {
    async fn run(mut self) -> Result<BurnSM, DriverError> {
        info!(
            session_id = %self.sm.tx().id,
            auto_submit = %self.cfg.auto_submit(),
            "starting burn session"
        );

        let outcome = self.drive().await;

        let BurnDriver {
            sm,
            dispatcher,
            shutdown_timeout,
            ..
        } = self;
        // also detaches the listener from the chains
        dispatcher.shutdown(shutdown_timeout).await;

        info!(session_id = %sm.tx().id, state = %sm.state(), "burn session stopped");
        outcome.map(|()| sm)
    }

    async fn drive(&mut self) -> Result<(), DriverError> {
        self.process(BurnEvent::Restore)?;

        while !self.sm.state().is_terminal() {
            match self.mux.next().await {
                SessionInput::DutyFailed(err) => return Err(err.into()),
                SessionInput::Executor(event) | SessionInput::Control(event) => {
                    self.process(event)?;
                }
                // burn sessions are started without a timer
                SessionInput::Expired => {}
                SessionInput::Shutdown => {
                    info!(session_id = %self.sm.tx().id, "shutdown requested");
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    /// Processes a single event through the machine.
    ///
    /// On success, dispatches the emitted duties and publishes the new snapshot. Duplicate and
    /// rejected events are non-fatal (logged and skipped). All other errors are fatal.
    fn process(&mut self, event: BurnEvent) -> Result<(), DriverError> {
        let session_id = self.sm.tx().id.clone();
        let from = *self.sm.state();
        trace!(%session_id, %event, "processing event");

        match self.sm.process_event(self.cfg.clone(), event) {
            Ok(output) => {
                let to = *self.sm.state();
                if from != to {
                    info!(%session_id, %from, %to, "session transitioned");
                }

                for duty in output.duties {
                    self.dispatcher.dispatch(duty);
                }

                self.snapshots.send_replace(self.sm.clone());
                Ok(())
            }
            Err(err) => ProcessError::from_sm_error(&session_id, err).absorb(),
        }
    }
}
