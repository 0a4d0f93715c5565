//! This component multiplexes the inputs of a session driver into a single stream that is
//! consumed by the driver's event loop, decoupling event reception from event processing.

use std::{future, pin::Pin};

use ren_gateway_exec::errors::ExecutorError;
use tokio::{sync::mpsc::UnboundedReceiver, time::Sleep};
use tokio_util::sync::CancellationToken;

/// All possible inputs of a session driver carrying events of type `E`.
#[derive(Debug)]
pub enum SessionInput<E> {
    /// Priority 0: A duty failed in a way that must stop the session.
    DutyFailed(ExecutorError),
    /// Priority 1: The outcome of a duty, reported by its executor.
    Executor(E),
    /// Priority 2: Graceful shutdown request.
    Shutdown,
    /// Priority 3: A command issued by the user through a session handle.
    Control(E),
    /// Priority 4: The session's expiry time has passed.
    Expired,
}

/// A wrapper for holding all the input pins of a session driver and multiplexing them into a
/// single stream of [`SessionInput`]s.
#[derive(Debug)]
pub struct EventsMux<E> {
    /// Fatal duty failures.
    pub failures_rx: UnboundedReceiver<ExecutorError>,

    /// Events reported by executors.
    pub outbox_rx: UnboundedReceiver<E>,

    /// Cancelled when the session must shut down.
    pub shutdown: CancellationToken,

    /// Events sent through session handles.
    pub controls_rx: UnboundedReceiver<E>,

    /// Fires once when the session expires. Sessions without an expiry never fire.
    pub expiry: Option<Pin<Box<Sleep>>>,
}

impl<E> EventsMux<E> {
    /// Get the next available input, respecting the priority ordering.
    pub async fn next(&mut self) -> SessionInput<E> {
        tokio::select! {
            biased; // follow the same order as written below.

            // A broken contract with a capability outranks everything else.
            Some(err) = self.failures_rx.recv() => SessionInput::DutyFailed(err),

            // Executor reports come before shutdown so that the last snapshot reflects every
            // outcome that was already delivered.
            Some(event) = self.outbox_rx.recv() => SessionInput::Executor(event),

            _ = self.shutdown.cancelled() => SessionInput::Shutdown,

            Some(event) = self.controls_rx.recv() => SessionInput::Control(event),

            _ = expire(&mut self.expiry) => {
                self.expiry = None; // fire only once
                SessionInput::Expired
            }
        }
    }
}

async fn expire(expiry: &mut Option<Pin<Box<Sleep>>>) {
    match expiry {
        Some(timer) => timer.await,
        None => future::pending().await,
    }
}
