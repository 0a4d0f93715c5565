//! Error types for the executors.

use ren_gateway_capabilities::CapabilityError;
use thiserror::Error;

/// Errors that can occur during executor operations.
///
/// Except for [`ExecutorError::MissingBurnDetails`], the outcome behind each of these has
/// already been reported to the owning session as an event by the time the error is returned.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// A call into a chain or the protocol failed.
    #[error("capability error: {0}")]
    Capability(#[from] CapabilityError),

    /// The protocol reported a burn as final without the details needed to release it.
    #[error("burn {0} was reported final without burn details")]
    MissingBurnDetails(String),

    /// The session that owns the duty is gone.
    #[error("event outbox closed")]
    OutboxClosed,
}

impl ExecutorError {
    /// Whether this error breaks the contract between the session and its capabilities.
    ///
    /// Such errors must stop the session instead of being logged and skipped.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, ExecutorError::MissingBurnDetails(_))
    }
}
