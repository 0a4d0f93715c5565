//! Session contexts: a serialized session record together with the capabilities it runs against.

use std::sync::Arc;

use ren_gateway_capabilities::{ChainMap, DestFactory, RenProtocol, SourceFactory};
use ren_gateway_exec::output_handles::{BurnOutputHandles, MintOutputHandles};
use ren_gateway_primitives::{burn::BurnSession, session::GatewaySession, types::Network};
use thiserror::Error;

use crate::sdk_cache::SdkCache;

/// Errors that can occur while building a session context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// No capability is registered for a chain named by the session.
    #[error("no capability registered for chain {chain} (known chains: {known:?})")]
    UnknownChain {
        /// The chain named by the session.
        chain: String,
        /// The chains the map knows about.
        known: Vec<String>,
    },
}

/// Everything needed to start a lock-and-mint session.
#[expect(missing_debug_implementations)]
#[derive(Clone)]
pub struct MintContext {
    /// The session record, fresh or restored from a snapshot.
    pub session: GatewaySession,

    /// The protocol deployment the session runs against.
    pub protocol: Arc<dyn RenProtocol>,

    /// Produces the capability of the chain the asset is locked on.
    pub source: SourceFactory<GatewaySession>,

    /// Produces the capability of the chain the wrapped asset is minted on.
    pub dest: DestFactory<GatewaySession>,
}

impl MintContext {
    /// Instantiates the session's capabilities.
    pub fn output_handles(&self) -> MintOutputHandles {
        MintOutputHandles {
            source: (self.source)(&self.session),
            dest: (self.dest)(&self.session),
            protocol: self.protocol.clone(),
        }
    }
}

/// Everything needed to start a burn-and-release session.
#[expect(missing_debug_implementations)]
#[derive(Clone)]
pub struct BurnContext {
    /// The session record, fresh or restored from a snapshot.
    pub session: BurnSession,

    /// The protocol deployment the session runs against.
    pub protocol: Arc<dyn RenProtocol>,

    /// Produces the capability of the host chain the wrapped asset is burned on.
    pub from: DestFactory<BurnSession>,

    /// Produces the capability of the native chain the asset is released on.
    pub to: SourceFactory<BurnSession>,

    /// Whether the burn is submitted without waiting for the user.
    pub auto_submit: bool,
}

impl BurnContext {
    /// Instantiates the session's capabilities.
    pub fn output_handles(&self) -> BurnOutputHandles {
        BurnOutputHandles {
            protocol: self.protocol.clone(),
            from: (self.from)(&self.session),
            to: (self.to)(&self.session),
        }
    }
}

fn resolve<'a, F>(map: &'a ChainMap<F>, chain: &str) -> Result<&'a F, ContextError> {
    map.get(chain).ok_or_else(|| ContextError::UnknownChain {
        chain: chain.to_string(),
        known: map.chains().map(str::to_string).collect(),
    })
}

/// Builds a [`MintContext`] by looking up the session's `source_chain` in `sources` and its
/// `dest_chain` in `dests`.
///
/// The protocol handle comes from `sdk`; `init` only runs if no session on the same network
/// has been built from this cache yet.
pub fn build_mint_context_with_map(
    session: GatewaySession,
    sdk: &SdkCache,
    init: impl FnOnce(Network) -> Arc<dyn RenProtocol>,
    sources: &ChainMap<SourceFactory<GatewaySession>>,
    dests: &ChainMap<DestFactory<GatewaySession>>,
) -> Result<MintContext, ContextError> {
    let source = resolve(sources, &session.source_chain)?.clone();
    let dest = resolve(dests, &session.dest_chain)?.clone();
    let protocol = sdk.get_or_init(session.network, init);

    Ok(MintContext {
        session,
        protocol,
        source,
        dest,
    })
}

/// Builds a [`BurnContext`] by looking up the session's `source_chain` (the host chain) in
/// `hosts` and its `dest_chain` (the native chain) in `natives`.
///
/// The protocol handle is shared through `sdk` like [`build_mint_context_with_map`].
pub fn build_burn_context_with_map(
    session: BurnSession,
    sdk: &SdkCache,
    init: impl FnOnce(Network) -> Arc<dyn RenProtocol>,
    hosts: &ChainMap<DestFactory<BurnSession>>,
    natives: &ChainMap<SourceFactory<BurnSession>>,
    auto_submit: bool,
) -> Result<BurnContext, ContextError> {
    let from = resolve(hosts, &session.source_chain)?.clone();
    let to = resolve(natives, &session.dest_chain)?.clone();
    let protocol = sdk.get_or_init(session.network, init);

    Ok(BurnContext {
        session,
        protocol,
        from,
        to,
        auto_submit,
    })
}
