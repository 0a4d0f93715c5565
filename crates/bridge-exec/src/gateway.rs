//! This module contains the executors for performing duties emitted in the Gateway State Machine
//! transitions.

use std::sync::Arc;

use ren_gateway_capabilities::{CapabilityError, SourceChainEvent};
use ren_gateway_primitives::{
    deposit::{DepositTransaction, SubmittingDeposit},
    session::GatewaySession,
    types::TxHash,
};
use ren_gateway_sm::{
    deposit::events::DepositEvent,
    gateway::{duties::GatewayDuty, events::GatewayEvent},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::ExecutionConfig,
    errors::ExecutorError,
    outbox::{report, Outbox},
    output_handles::MintOutputHandles,
};

/// Executes the given gateway duty.
///
/// `session` is the gateway's record at the time the duty was emitted. `cancel` stops the
/// long-running watchers; for [`GatewayDuty::CancelWatch`] and
/// [`GatewayDuty::CancelConfirmations`] it must be the token of the watch to stop, which this
/// executor cancels.
pub async fn execute_gateway_duty(
    cfg: Arc<ExecutionConfig>,
    output_handles: Arc<MintOutputHandles>,
    session: &GatewaySession,
    duty: &GatewayDuty,
    outbox: Outbox<GatewayEvent>,
    cancel: CancellationToken,
) -> Result<(), ExecutorError> {
    match duty {
        GatewayDuty::CreateGatewayAddress { session } => {
            create_gateway_address(&output_handles, session, &outbox).await
        }
        GatewayDuty::WatchDeposits { session } => {
            watch_deposits(&output_handles, session, &outbox, cancel).await
        }
        GatewayDuty::CancelWatch => {
            cancel.cancel();
            info!(session_id = %session.id, "cancelled deposit watch");
            Ok(())
        }
        GatewayDuty::RestoreDeposit { deposit } => {
            restore_deposit(&cfg, &output_handles, deposit, &outbox).await
        }
        GatewayDuty::WatchConfirmations { deposit } => {
            watch_confirmations(&cfg, &output_handles, deposit, &outbox, cancel).await
        }
        GatewayDuty::CancelConfirmations { source_tx_hash } => {
            cancel.cancel();
            info!(%source_tx_hash, "cancelled confirmation watch");
            Ok(())
        }
        GatewayDuty::RequestSignature { deposit } => {
            request_signature(&output_handles, session, deposit, &outbox).await
        }
        GatewayDuty::SubmitMint { deposit } => submit_mint(&output_handles, deposit, &outbox).await,
    }
}

fn to_deposit(source_tx_hash: &TxHash, event: DepositEvent) -> GatewayEvent {
    GatewayEvent::ToDeposit {
        source_tx_hash: source_tx_hash.clone(),
        event,
    }
}

/// Allocates the session's deposit address.
async fn create_gateway_address(
    output_handles: &MintOutputHandles,
    session: &GatewaySession,
    outbox: &Outbox<GatewayEvent>,
) -> Result<(), ExecutorError> {
    info!(session_id = %session.id, "allocating deposit address");

    match output_handles.source.create_gateway(session).await {
        Ok(session) => {
            info!(
                session_id = %session.id,
                gateway_address = ?session.gateway_address,
                "allocated deposit address"
            );
            report(outbox, GatewayEvent::GatewayCreated { session })
        }
        Err(err) => {
            report(
                outbox,
                GatewayEvent::GatewayCreationFailed {
                    error: err.to_string(),
                },
            )?;
            Err(err.into())
        }
    }
}

/// Watches the deposit address until cancelled, reporting every deposit it sees.
async fn watch_deposits(
    output_handles: &MintOutputHandles,
    session: &GatewaySession,
    outbox: &Outbox<GatewayEvent>,
    cancel: CancellationToken,
) -> Result<(), ExecutorError> {
    let mut deposits = match output_handles.source.watch_deposits(session).await {
        Ok(deposits) => deposits,
        Err(err) => {
            report(
                outbox,
                GatewayEvent::WatchFailed {
                    error: err.to_string(),
                },
            )?;
            return Err(err.into());
        }
    };

    report(outbox, GatewayEvent::ListenerReady)?;
    info!(session_id = %session.id, "watching for deposits");

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!(session_id = %session.id, "deposit watch stopped");
                return Ok(());
            }

            event = deposits.recv() => match event {
                Some(SourceChainEvent::Detected(deposit)) => {
                    info!(source_tx_hash = %deposit.source_tx_hash, "detected deposit");
                    report(outbox, GatewayEvent::DepositDetected { deposit: deposit.into() })?;
                }
                Some(SourceChainEvent::Reverted { source_tx_hash, reason }) => {
                    warn!(%source_tx_hash, %reason, "deposit reverted");
                    report(outbox, to_deposit(&source_tx_hash, DepositEvent::Reverted { reason }))?;
                }
                None => {
                    warn!(session_id = %session.id, "deposit watch ended");
                    return Ok(());
                }
            },
        }
    }
}

/// Reports the deposit's record refreshed with the chain's current confirmations.
async fn restore_deposit(
    cfg: &ExecutionConfig,
    output_handles: &MintOutputHandles,
    deposit: &DepositTransaction,
    outbox: &Outbox<GatewayEvent>,
) -> Result<(), ExecutorError> {
    let source_tx_hash = deposit.source_tx_hash();
    let source = &output_handles.source;

    let restored = async {
        let confs = source.confirmations(source_tx_hash).await?;
        let target = source
            .confirmation_target(source_tx_hash)
            .await?
            .unwrap_or(cfg.default_confirmation_target);

        Ok::<_, CapabilityError>(
            deposit.clone().with_confirmations(confs, Some(target)),
        )
    }
    .await;

    match restored {
        Ok(deposit) => {
            debug!(%source_tx_hash, confirmations = ?deposit.confirmations(), "restored deposit");
            report(
                outbox,
                GatewayEvent::DepositRestored {
                    deposit,
                    is_final: true,
                },
            )
        }
        Err(err) => {
            report(
                outbox,
                to_deposit(
                    source_tx_hash,
                    DepositEvent::Error {
                        error: err.to_string(),
                    },
                ),
            )?;
            Err(err.into())
        }
    }
}

/// Reports every confirmation count until the deposit reaches its target or the watch is
/// cancelled.
async fn watch_confirmations(
    cfg: &ExecutionConfig,
    output_handles: &MintOutputHandles,
    deposit: &DepositTransaction,
    outbox: &Outbox<GatewayEvent>,
    cancel: CancellationToken,
) -> Result<(), ExecutorError> {
    let source_tx_hash = deposit.source_tx_hash();
    let source = &output_handles.source;

    let watch = async {
        let target = source
            .confirmation_target(source_tx_hash)
            .await?
            .unwrap_or(cfg.default_confirmation_target);
        let counts = source.watch_confirmations(source_tx_hash).await?;

        Ok::<_, CapabilityError>((target, counts))
    }
    .await;

    let (target, mut counts) = match watch {
        Ok(watch) => watch,
        Err(err) => {
            report(
                outbox,
                to_deposit(
                    source_tx_hash,
                    DepositEvent::Error {
                        error: err.to_string(),
                    },
                ),
            )?;
            return Err(err.into());
        }
    };

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => return Ok(()),

            confs = counts.recv() => match confs {
                Some(confs) if confs >= target => {
                    info!(%source_tx_hash, %confs, %target, "deposit confirmed");
                    return report(
                        outbox,
                        to_deposit(source_tx_hash, DepositEvent::Confirmed { confs, target }),
                    );
                }
                Some(confs) => {
                    debug!(%source_tx_hash, %confs, %target, "deposit confirmation");
                    report(
                        outbox,
                        to_deposit(
                            source_tx_hash,
                            DepositEvent::Confirmation { confs, target: Some(target) },
                        ),
                    )?;
                }
                None => {
                    debug!(%source_tx_hash, "confirmation watch ended before target");
                    return Ok(());
                }
            },
        }
    }
}

/// Asks the protocol to sign a settled deposit.
///
/// A revert is a definitive answer about the deposit, not a failure of this executor.
async fn request_signature(
    output_handles: &MintOutputHandles,
    session: &GatewaySession,
    deposit: &DepositTransaction,
    outbox: &Outbox<GatewayEvent>,
) -> Result<(), ExecutorError> {
    let source_tx_hash = deposit.source_tx_hash();
    info!(%source_tx_hash, "requesting deposit signature");

    match output_handles.protocol.sign_deposit(session, deposit).await {
        Ok(signature) => report(
            outbox,
            to_deposit(
                source_tx_hash,
                DepositEvent::Signed {
                    ren_vm_hash: signature.ren_vm_hash,
                    ren_signature: signature.ren_signature,
                },
            ),
        ),
        Err(err) if err.is_reverted() => {
            warn!(%source_tx_hash, %err, "protocol rejected deposit");
            report(
                outbox,
                to_deposit(
                    source_tx_hash,
                    DepositEvent::Reverted {
                        reason: err.to_string(),
                    },
                ),
            )
        }
        Err(err) => {
            report(
                outbox,
                to_deposit(
                    source_tx_hash,
                    DepositEvent::SignError {
                        error: err.to_string(),
                    },
                ),
            )?;
            Err(err.into())
        }
    }
}

/// Submits the mint for a claimed deposit.
async fn submit_mint(
    output_handles: &MintOutputHandles,
    deposit: &SubmittingDeposit,
    outbox: &Outbox<GatewayEvent>,
) -> Result<(), ExecutorError> {
    let source_tx_hash = &deposit.accepted.confirming.detected.source_tx_hash;
    info!(%source_tx_hash, "submitting mint");

    match output_handles.dest.submit_mint(deposit).await {
        Ok(receipt) => {
            info!(%source_tx_hash, dest_tx_hash = %receipt.dest_tx_hash, "mint submitted");
            report(
                outbox,
                to_deposit(
                    source_tx_hash,
                    DepositEvent::Submitted {
                        dest_tx_hash: receipt.dest_tx_hash,
                        dest_tx_amount: receipt.dest_tx_amount,
                    },
                ),
            )
        }
        Err(err) => {
            report(
                outbox,
                to_deposit(
                    source_tx_hash,
                    DepositEvent::SubmitError {
                        error: err.to_string(),
                    },
                ),
            )?;
            Err(err.into())
        }
    }
}
