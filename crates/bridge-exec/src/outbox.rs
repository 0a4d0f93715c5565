//! The channel through which executors report outcomes back to their session.

use tokio::sync::mpsc::UnboundedSender;

use crate::errors::ExecutorError;

/// Sending half of a session's event queue.
pub type Outbox<E> = UnboundedSender<E>;

/// Reports `event` to the session, failing if the session is gone.
pub fn report<E>(outbox: &Outbox<E>, event: E) -> Result<(), ExecutorError> {
    outbox.send(event).map_err(|_| ExecutorError::OutboxClosed)
}
