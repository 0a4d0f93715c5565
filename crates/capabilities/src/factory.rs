//! Factories that produce capabilities for a session record.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{dest::DestChain, source::SourceChain};

/// Produces the source-chain capability for a session record of type `S`.
pub type SourceFactory<S> = Arc<dyn Fn(&S) -> Arc<dyn SourceChain> + Send + Sync>;

/// Produces the destination-chain capability for a session record of type `S`.
pub type DestFactory<S> = Arc<dyn Fn(&S) -> Arc<dyn DestChain> + Send + Sync>;

/// Capability factories keyed by chain name.
#[derive(Clone)]
pub struct ChainMap<F> {
    chains: BTreeMap<String, F>,
}

impl<F> ChainMap<F> {
    /// Creates an empty map.
    pub const fn new() -> Self {
        Self {
            chains: BTreeMap::new(),
        }
    }

    /// Registers `factory` under `chain`, replacing any previous entry.
    pub fn with_chain(mut self, chain: impl Into<String>, factory: F) -> Self {
        self.chains.insert(chain.into(), factory);
        self
    }

    /// Returns the factory registered for `chain`.
    pub fn get(&self, chain: &str) -> Option<&F> {
        self.chains.get(chain)
    }

    /// Returns the names of all registered chains.
    pub fn chains(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }
}

impl<F> Default for ChainMap<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for ChainMap<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainMap")
            .field("chains", &self.chains.keys().collect::<Vec<_>>())
            .finish()
    }
}
