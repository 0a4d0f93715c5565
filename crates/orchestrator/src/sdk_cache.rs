//! An explicit cache of protocol handles, one per network.

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;
use ren_gateway_capabilities::RenProtocol;
use ren_gateway_primitives::types::Network;

/// Protocol handles memoized per [`Network`].
///
/// The cache lives as long as its owner. Handles are shared by every session started from it
/// until [`SdkCache::reset`] is called.
#[derive(Debug, Default)]
pub struct SdkCache {
    handles: Mutex<BTreeMap<Network, Arc<dyn RenProtocol>>>,
}

impl SdkCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `network`, building it with `init` on first use.
    ///
    /// `init` runs while the cache is locked and must not call back into it.
    pub fn get_or_init(
        &self,
        network: Network,
        init: impl FnOnce(Network) -> Arc<dyn RenProtocol>,
    ) -> Arc<dyn RenProtocol> {
        self.handles
            .lock()
            .entry(network)
            .or_insert_with(|| init(network))
            .clone()
    }

    /// Returns the cached handle for `network`, if any.
    pub fn get(&self, network: Network) -> Option<Arc<dyn RenProtocol>> {
        self.handles.lock().get(&network).cloned()
    }

    /// Drops every cached handle.
    pub fn reset(&self) {
        self.handles.lock().clear();
    }
}
