//! Errors reported by capability implementations.

use thiserror::Error;

/// Failure of a call into a chain or protocol capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The transaction was reverted on chain. This is definitive, retrying will not help.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// The remote service could not be reached or timed out.
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    /// The request was malformed for this chain.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Any other failure reported by the chain.
    #[error("{0}")]
    Other(String),
}

impl CapabilityError {
    /// Whether this error is a definitive on-chain revert.
    pub const fn is_reverted(&self) -> bool {
        matches!(self, CapabilityError::Reverted(_))
    }
}

/// Result alias for capability calls.
pub type CapabilityResult<T> = Result<T, CapabilityError>;
