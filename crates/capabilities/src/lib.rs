//! Interfaces to the external collaborators of a transfer session.
//!
//! A session never talks to a blockchain or to the protocol directly. It only invokes the
//! capabilities defined here, which callers implement per chain and hand to the session through
//! factory functions.

pub mod dest;
pub mod errors;
pub mod factory;
pub mod protocol;
pub mod source;

pub use dest::{DestChain, MintReceipt};
pub use errors::{CapabilityError, CapabilityResult};
pub use factory::{ChainMap, DestFactory, SourceFactory};
pub use protocol::{
    BurnAndRelease, BurnAndReleaseParams, BurnDetails, BurnProgress, DepositSignature,
    ReleaseProgress, RenProtocol,
};
pub use source::{SourceChain, SourceChainEvent};
