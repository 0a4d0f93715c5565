//! The driver of lock-and-mint sessions.
//!
//! A driver owns one [`GatewaySM`] and feeds it one event at a time: the outcomes reported by the
//! executors of its duties, the commands sent through its [`GatewayHandle`] and the expiry of
//! the session. After every accepted event the driver dispatches the emitted duties and publishes
//! a snapshot of the machine.

use std::{pin::Pin, sync::Arc, time::Duration};

use ren_gateway_exec::config::ExecutionConfig;
use ren_gateway_params::SessionParams;
use ren_gateway_primitives::types::{now_millis, Timestamp};
use ren_gateway_sm::{
    gateway::{events::GatewayEvent, machine::GatewaySM},
    state_machine::StateMachine,
};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Sleep,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, trace};

use crate::{
    context::MintContext,
    duty_dispatcher::MintDutyDispatcher,
    errors::{DriverError, ProcessError},
    events_mux::{EventsMux, SessionInput},
    handle::GatewayHandle,
};

/// Starts a lock-and-mint session on the current tokio runtime.
///
/// The session resumes from whatever its record already holds: an opened session is not
/// allocated a new deposit address, and recorded deposits are restored once the deposit watch is
/// running. The returned task resolves to the last snapshot of the machine when the session
/// reaches a terminal state or is shut down through its handle.
pub fn start_mint(
    ctx: MintContext,
    params: SessionParams,
) -> (GatewayHandle, JoinHandle<Result<GatewaySM, DriverError>>) {
    let output_handles = Arc::new(ctx.output_handles());
    let sm = GatewaySM::new(ctx.session);
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
        expiry: Some(expiry_timer(sm.tx().expiry_time)),
    };
    let dispatcher = MintDutyDispatcher::new(
        Arc::new(ExecutionConfig::from(&params)),
        output_handles,
        outbox,
        failures,
        CancellationToken::new(),
    );

    let driver = MintDriver {
        sm,
        mux,
        dispatcher,
        snapshots,
        shutdown_timeout: params.shutdown_timeout(),
    };
    let handle = GatewayHandle::new(session_id, controls, snapshots_rx, shutdown);

    (handle, tokio::spawn(driver.run()))
}

fn expiry_timer(expiry_time: Timestamp) -> Pin<Box<Sleep>> {
    let remaining = expiry_time.saturating_sub(now_millis());
    Box::pin(tokio::time::sleep(Duration::from_millis(remaining)))
}

#[derive(Debug)]
struct MintDriver {
    sm: GatewaySM,
    mux: EventsMux<GatewayEvent>,
    dispatcher: MintDutyDispatcher,
    snapshots: watch::Sender<GatewaySM>,
    shutdown_timeout: Duration,
}

impl MintDriver {
    async fn run(mut self) -> Result<GatewaySM, DriverError> {
        info!(session_id = %self.sm.tx().id, "starting mint session");

        let outcome = self.drive().await;

        let MintDriver {
            sm,
            dispatcher,
            shutdown_timeout,
            ..
        } = self;
        dispatcher.shutdown(shutdown_timeout).await;

        info!(session_id = %sm.tx().id, state = %sm.state(), "mint session stopped");
        outcome.map(|()| sm)
    }

    async fn drive(&mut self) -> Result<(), DriverError> {
        self.process(GatewayEvent::Restore { now: now_millis() })?;

        while !self.sm.state().is_terminal() {
            match self.mux.next().await {
                SessionInput::DutyFailed(err) => return Err(err.into()),
                SessionInput::Executor(event) | SessionInput::Control(event) => {
                    self.process(event)?;
                }
                SessionInput::Expired => self.process(GatewayEvent::Expired)?,
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
    fn process(&mut self, event: GatewayEvent) -> Result<(), DriverError> {
        let session_id = self.sm.tx().id.clone();
        let from = *self.sm.state();
        trace!(%session_id, %event, "processing event");

        match self.sm.process_event((), event) {
            Ok(output) => {
                let to = *self.sm.state();
                if from != to {
                    info!(%session_id, %from, %to, "session transitioned");
                }

                for duty in output.duties {
                    self.dispatcher.dispatch(self.sm.tx(), duty);
                }

                self.snapshots.send_replace(self.sm.clone());
                Ok(())
            }
            Err(err) => ProcessError::from_sm_error(&session_id, err).absorb(),
        }
    }
}
