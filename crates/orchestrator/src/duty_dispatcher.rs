//! Provides interface for dispatching duties to the appropriate executors.

use std::{collections::BTreeMap, future::Future, sync::Arc, time::Duration};

use ren_gateway_exec::{
    burn::{run_burn_listener, schedule_submit, ListenerCommand},
    config::ExecutionConfig,
    errors::ExecutorError,
    gateway::execute_gateway_duty,
    outbox::Outbox,
    output_handles::{BurnOutputHandles, MintOutputHandles},
};
use ren_gateway_primitives::{session::GatewaySession, types::TxHash};
use ren_gateway_sm::{
    burn::{duties::BurnDuty, events::BurnEvent},
    gateway::{duties::GatewayDuty, events::GatewayEvent},
};
use tokio::{
    sync::mpsc::{self, UnboundedSender},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// The duty executions owned by one session.
///
/// Each duty runs in its own task. Executors report their outcome through the session's outbox;
/// a failure is logged here and, if it breaks the session's contract, forwarded to the driver.
#[derive(Debug)]
struct DutyTasks {
    cancel: CancellationToken,
    failures: UnboundedSender<ExecutorError>,
    tasks: JoinSet<()>,
}

impl DutyTasks {
    fn new(cancel: CancellationToken, failures: UnboundedSender<ExecutorError>) -> Self {
        Self {
            cancel,
            failures,
            tasks: JoinSet::new(),
        }
    }

    fn spawn<F>(&mut self, duty: String, execution: F)
    where
        F: Future<Output = Result<(), ExecutorError>> + Send + 'static,
    {
        let failures = self.failures.clone();

        self.tasks.spawn(async move {
            if let Err(err) = execution.await {
                error!(%err, %duty, "failed to execute duty");

                if err.is_fatal() {
                    // the driver may already be gone, in which case there is no one to stop
                    let _ = failures.send(err);
                }
            }
        });

        // reap whatever has finished so that long sessions do not accumulate handles
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(err) = result {
                error!(%err, "duty task did not run to completion");
            }
        }
    }

    async fn shutdown(mut self, grace: Duration) {
        self.cancel.cancel();

        let drained = tokio::time::timeout(grace, async {
            while self.tasks.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            warn!(
                remaining = %self.tasks.len(),
                "aborting duties that outlived the shutdown timeout"
            );
            self.tasks.abort_all();
        }
    }
}

/// The `MintDutyDispatcher` is responsible for dispatching the duties emitted by a gateway
/// session to the gateway executors.
#[derive(Debug)]
pub struct MintDutyDispatcher {
    cfg: Arc<ExecutionConfig>,
    handles: Arc<MintOutputHandles>,
    outbox: Outbox<GatewayEvent>,
    deposit_watch: CancellationToken,
    confirmation_watches: BTreeMap<TxHash, CancellationToken>,
    tasks: DutyTasks,
}

impl MintDutyDispatcher {
    /// Creates a dispatcher whose executions report to `outbox`, stop when `cancel` is cancelled
    /// and forward fatal failures to `failures`.
    pub fn new(
        cfg: Arc<ExecutionConfig>,
        handles: Arc<MintOutputHandles>,
        outbox: Outbox<GatewayEvent>,
        failures: UnboundedSender<ExecutorError>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            handles,
            outbox,
            deposit_watch: cancel.child_token(),
            confirmation_watches: BTreeMap::new(),
            tasks: DutyTasks::new(cancel, failures),
        }
    }

    /// Dispatches a duty emitted while the session record was `session`.
    ///
    /// Each such duty execution is fire-and-forget. This assumes that each duty execution is
    /// **idempotent**: a duty may be emitted again after a restart.
    pub fn dispatch(&mut self, session: &GatewaySession, duty: GatewayDuty) {
        let cancel = match &duty {
            GatewayDuty::WatchDeposits { .. } => {
                // a session watches for deposits at most once at a time
                self.deposit_watch.cancel();
                self.deposit_watch = self.tasks.cancel.child_token();
                self.deposit_watch.clone()
            }
            GatewayDuty::CancelWatch => {
                for watch in std::mem::take(&mut self.confirmation_watches).into_values() {
                    watch.cancel();
                }
                self.deposit_watch.clone()
            }
            GatewayDuty::WatchConfirmations { deposit } => {
                // one confirmation watch per deposit
                let watch = self.tasks.cancel.child_token();
                let hash = deposit.source_tx_hash().clone();
                if let Some(previous) = self.confirmation_watches.insert(hash, watch.clone()) {
                    previous.cancel();
                }
                watch
            }
            GatewayDuty::CancelConfirmations { source_tx_hash } => self
                .confirmation_watches
                .remove(source_tx_hash)
                .unwrap_or_else(|| self.tasks.cancel.child_token()),
            _ => self.tasks.cancel.child_token(),
        };

        debug!(session_id = %session.id, %duty, "dispatching gateway duty");

        let cfg = self.cfg.clone();
        let handles = self.handles.clone();
        let outbox = self.outbox.clone();
        let session = session.clone();
        let label = duty.to_string();

        self.tasks.spawn(label, async move {
            execute_gateway_duty(cfg, handles, &session, &duty, outbox, cancel).await
        });
    }

    /// Cancels every running duty, waits up to `grace` for them to finish and aborts the rest.
    pub async fn shutdown(self, grace: Duration) {
        self.tasks.shutdown(grace).await;
    }
}

/// A running burn-and-release listener.
#[derive(Debug)]
struct Listener {
    commands: UnboundedSender<ListenerCommand>,
    cancel: CancellationToken,
}

/// The `BurnDutyDispatcher` is responsible for dispatching the duties emitted by a burn session
/// to its burn-and-release listener.
#[derive(Debug)]
pub struct BurnDutyDispatcher {
    cfg: Arc<ExecutionConfig>,
    handles: Arc<BurnOutputHandles>,
    outbox: Outbox<BurnEvent>,
    listener: Option<Listener>,
    tasks: DutyTasks,
}

impl BurnDutyDispatcher {
    /// Creates a dispatcher whose executions report to `outbox`, stop when `cancel` is cancelled
    /// and forward fatal failures to `failures`.
    pub fn new(
        cfg: Arc<ExecutionConfig>,
        handles: Arc<BurnOutputHandles>,
        outbox: Outbox<BurnEvent>,
        failures: UnboundedSender<ExecutorError>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            handles,
            outbox,
            listener: None,
            tasks: DutyTasks::new(cancel, failures),
        }
    }

    /// Dispatches a duty to the listener, spawning the listener first if asked to.
    pub fn dispatch(&mut self, duty: BurnDuty) {
        debug!(%duty, "dispatching burn duty");

        match duty {
            BurnDuty::SpawnListener { session } => {
                if let Some(previous) = self.listener.take() {
                    warn!(session_id = %session.id, "replacing running burn listener");
                    previous.cancel.cancel();
                }

                let (commands, commands_rx) = mpsc::unbounded_channel();
                let cancel = self.tasks.cancel.child_token();
                let label = format!("SpawnListener (session: {})", session.id);

                self.tasks.spawn(
                    label,
                    run_burn_listener(
                        self.cfg.clone(),
                        self.handles.clone(),
                        session,
                        commands_rx,
                        self.outbox.clone(),
                        cancel.clone(),
                    ),
                );
                self.listener = Some(Listener { commands, cancel });
            }
            BurnDuty::ScheduleSubmit => {
                self.tasks.spawn(
                    "ScheduleSubmit".to_string(),
                    schedule_submit(
                        self.cfg.auto_submit_delay,
                        self.outbox.clone(),
                        self.tasks.cancel.child_token(),
                    ),
                );
            }
            BurnDuty::SubmitBurn => self.command(ListenerCommand::Submit),
            BurnDuty::Release => self.command(ListenerCommand::Release),
        }
    }

    fn command(&self, command: ListenerCommand) {
        let delivered = self
            .listener
            .as_ref()
            .is_some_and(|listener| listener.commands.send(command).is_ok());

        if !delivered {
            error!(?command, "burn listener is not running");
        }
    }

    /// Cancels the listener and every other running duty, waits up to `grace` for them to finish
    /// and aborts the rest.
    pub async fn shutdown(self, grace: Duration) {
        self.tasks.shutdown(grace).await;
    }
}
