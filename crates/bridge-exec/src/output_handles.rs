//! The handles for external services that need to be accessed by the executors.

use std::sync::Arc;

use ren_gateway_capabilities::{DestChain, RenProtocol, SourceChain};

/// The capabilities a lock-and-mint session works with.
///
/// If this needs to be shared across multiple executors, it should be wrapped in an [`Arc`].
#[derive(Debug, Clone)]
pub struct MintOutputHandles {
    /// The chain the asset is locked on.
    pub source: Arc<dyn SourceChain>,

    /// The chain the wrapped asset is minted on.
    pub dest: Arc<dyn DestChain>,

    /// The protocol deployment that signs deposits.
    pub protocol: Arc<dyn RenProtocol>,
}

/// The capabilities a burn-and-release session works with.
#[derive(Debug, Clone)]
pub struct BurnOutputHandles {
    /// The protocol deployment that opens the burn-and-release.
    pub protocol: Arc<dyn RenProtocol>,

    /// The host chain the wrapped asset is burned on.
    pub from: Arc<dyn DestChain>,

    /// The native chain the asset is released on.
    pub to: Arc<dyn SourceChain>,
}
