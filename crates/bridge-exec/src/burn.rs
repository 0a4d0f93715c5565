//! This module contains the burn-and-release listener and the other executors for duties emitted
//! in the Burn State Machine transitions.
//!
//! Unlike the gateway executors, the burn executors share one long-lived actor per session: the
//! listener owns the protocol's burn-and-release handle and is driven by [`ListenerCommand`]s.

use std::{ops::Deref, sync::Arc, time::Duration};

use ren_gateway_capabilities::{
    BurnAndRelease, BurnAndReleaseParams, BurnProgress, ReleaseProgress,
};
use ren_gateway_primitives::{
    burn::{BurnSession, SubmittedBurn},
    subscription::Subscription,
    types::{now_millis, TxHash},
};
use ren_gateway_sm::burn::events::BurnEvent;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    config::ExecutionConfig,
    errors::ExecutorError,
    outbox::{report, Outbox},
    output_handles::BurnOutputHandles,
};

/// Commands a burn listener accepts from the session that spawned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerCommand {
    /// Submit the burn, or resume tracking a known one.
    Submit,

    /// Request the release.
    Release,
}

/// Detaches the handle's chain listeners when the listener stops, whichever way it stops.
#[derive(Debug)]
struct ListenerGuard(Box<dyn BurnAndRelease>);

impl Deref for ListenerGuard {
    type Target = dyn BurnAndRelease;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// What the listener has observed so far.
#[derive(Debug)]
struct ListenerState {
    /// The confirmation target of the burn.
    target: u64,

    /// Whether the burn was submitted in this listener's lifetime.
    submitted: bool,

    /// Whether the burn was already reported as confirmed.
    confirmed: bool,

    /// The highest confirmation count reported.
    confs: u64,

    /// The burn on the host chain, once known.
    source_tx_hash: Option<TxHash>,

    /// The release transaction and amount, once observed.
    release_tx: Option<(TxHash, String)>,
}

/// Runs the burn-and-release listener of a session until it is cancelled or the session drops
/// its command channel.
///
/// The listener opens the protocol's burn-and-release, resuming the session's burn if it has one,
/// and reports [`BurnEvent::Created`] once ready. The host-chain burn is submitted at most once
/// per listener no matter how many [`ListenerCommand::Submit`]s arrive. Every release request
/// starts a new release attempt.
pub async fn run_burn_listener(
    cfg: Arc<ExecutionConfig>,
    output_handles: Arc<BurnOutputHandles>,
    session: BurnSession,
    mut commands: UnboundedReceiver<ListenerCommand>,
    outbox: Outbox<BurnEvent>,
    cancel: CancellationToken,
) -> Result<(), ExecutorError> {
    let params = BurnAndReleaseParams {
        asset: session.source_asset.clone(),
        session: session.clone(),
        from: output_handles.from.clone(),
        to: output_handles.to.clone(),
        transaction: session.source_tx_hash().cloned(),
    };

    let handle = match output_handles.protocol.burn_and_release(params).await {
        Ok(handle) => ListenerGuard(handle),
        Err(err) => {
            report(
                &outbox,
                BurnEvent::BurnError {
                    error: err.to_string(),
                },
            )?;
            return Err(err.into());
        }
    };

    let target = match handle.confirmation_target().await {
        Ok(target) => target,
        Err(err) => {
            warn!(%err, "could not fetch confirmation target, using default");
            cfg.default_confirmation_target
        }
    };

    let mut state = ListenerState {
        target,
        submitted: false,
        confirmed: false,
        confs: 0,
        source_tx_hash: session.source_tx_hash().cloned(),
        release_tx: None,
    };
    let mut burn_progress: Option<Subscription<BurnProgress>> = None;
    let mut release_progress: Option<Subscription<ReleaseProgress>> = None;

    report(&outbox, BurnEvent::Created)?;
    info!(session_id = %session.id, resume = ?state.source_tx_hash, "burn listener ready");

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!(session_id = %session.id, "burn listener cancelled");
                return Ok(());
            }

            command = commands.recv() => match command {
                Some(ListenerCommand::Submit) if state.submitted => {
                    debug!(session_id = %session.id, "burn already submitted by this listener");
                }
                Some(ListenerCommand::Submit) => {
                    state.submitted = true;
                    info!(session_id = %session.id, "submitting burn");

                    match handle.burn().await {
                        Ok(progress) => burn_progress = Some(progress),
                        Err(err) => {
                            report(&outbox, BurnEvent::BurnError { error: err.to_string() })?;
                            return Err(err.into());
                        }
                    }
                }
                Some(ListenerCommand::Release) => {
                    info!(session_id = %session.id, "requesting release");

                    match handle.release().await {
                        Ok(progress) => release_progress = Some(progress),
                        Err(err) => {
                            // the session can retry, so the listener stays up
                            error!(session_id = %session.id, %err, "could not request release");
                            report(&outbox, BurnEvent::ReleaseError { error: err.to_string() })?;
                        }
                    }
                }
                None => {
                    debug!(session_id = %session.id, "session dropped, stopping burn listener");
                    return Ok(());
                }
            },

            progress = next_update(&mut burn_progress) => match progress {
                Some(progress) => {
                    if !on_burn_progress(&mut state, progress, &outbox)? {
                        burn_progress = None;
                    }
                }
                None => burn_progress = None,
            },

            progress = next_update(&mut release_progress) => match progress {
                Some(progress) => on_release_progress(&mut state, progress, &outbox)?,
                None => release_progress = None,
            },
        }
    }
}

/// Waits for the next update of an optional subscription. Never resolves without one.
async fn next_update<T>(subscription: &mut Option<Subscription<T>>) -> Option<T> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}

/// Maps burn progress to session events. Returns whether the burn is still being tracked.
fn on_burn_progress(
    state: &mut ListenerState,
    progress: BurnProgress,
    outbox: &Outbox<BurnEvent>,
) -> Result<bool, ExecutorError> {
    match progress {
        BurnProgress::TransactionHash {
            source_tx_hash,
            amount,
        } => {
            info!(%source_tx_hash, "burn broadcast");
            state.source_tx_hash = Some(source_tx_hash.clone());

            report(
                outbox,
                BurnEvent::Submitted {
                    burn: SubmittedBurn {
                        source_tx_hash,
                        detected_at: now_millis(),
                        source_tx_amount: amount,
                        source_tx_confs: 0,
                        source_tx_conf_target: state.target,
                    },
                },
            )?;
        }
        BurnProgress::Confirmation { confs, target } => {
            state.confs = state.confs.max(confs);
            report(outbox, BurnEvent::Confirmation { confs, target })?;

            if confs >= target && !state.confirmed {
                state.confirmed = true;
                report(outbox, BurnEvent::Confirmed { confs, target })?;
            }
        }
        BurnProgress::Burned(Some(details)) => {
            debug!(ren_vm_hash = %details.ren_vm_hash, "burn final");
            state.confirmed = true;

            report(
                outbox,
                BurnEvent::Confirmed {
                    confs: state.confs.max(state.target),
                    target: state.target,
                },
            )?;
        }
        BurnProgress::Burned(None) => {
            let source_tx_hash = state.source_tx_hash.clone().unwrap_or_default();
            error!(%source_tx_hash, "burn reported final without burn details");

            return Err(ExecutorError::MissingBurnDetails(source_tx_hash));
        }
        BurnProgress::Reverted(reason) => {
            warn!(%reason, "burn reverted");
            report(outbox, BurnEvent::BurnError { error: reason })?;

            return Ok(false);
        }
    }

    Ok(true)
}

/// Maps release progress to session events.
fn on_release_progress(
    state: &mut ListenerState,
    progress: ReleaseProgress,
    outbox: &Outbox<BurnEvent>,
) -> Result<(), ExecutorError> {
    match progress {
        ReleaseProgress::RenVmHash(ren_vm_hash) => {
            report(outbox, BurnEvent::Accepted { ren_vm_hash })
        }
        ReleaseProgress::Transaction {
            dest_tx_hash,
            amount,
        } => {
            debug!(%dest_tx_hash, %amount, "release transaction observed");
            state.release_tx = Some((dest_tx_hash, amount));
            Ok(())
        }
        ReleaseProgress::Released {
            dest_tx_hash,
            ren_response,
        } => {
            let (observed_hash, dest_tx_amount) = state.release_tx.take().unzip();
            let dest_tx_hash = dest_tx_hash.or(observed_hash);
            info!(?dest_tx_hash, "release answered");

            report(
                outbox,
                BurnEvent::Released {
                    dest_tx_hash,
                    ren_response,
                    dest_tx_amount,
                    completed_at: now_millis(),
                },
            )
        }
        ReleaseProgress::Failed(error) => {
            warn!(%error, "release failed");
            report(outbox, BurnEvent::ReleaseError { error })
        }
    }
}

/// Reports [`BurnEvent::Submit`] after `delay`, unless cancelled first.
pub async fn schedule_submit(
    delay: Duration,
    outbox: Outbox<BurnEvent>,
    cancel: CancellationToken,
) -> Result<(), ExecutorError> {
    tokio::select! {
        _ = cancel.cancelled() => Ok(()),
        _ = tokio::time::sleep(delay) => report(&outbox, BurnEvent::Submit),
    }
}
